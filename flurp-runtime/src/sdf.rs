//! # SDF 模块
//!
//! 距离场函数库：矩形边缘距离、圆角矩形有符号距离。
//!
//! 所有函数都是纯函数，每像素每帧调用一次，必须保持 O(1)。
//! 坐标约定：`p` 是**相对于矩形中心**的像素坐标，`half_extent` 是半宽/半高。

use serde::{Deserialize, Serialize};

/// 二维向量
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// 创建新的向量
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 零向量
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// 两个分量相同的向量
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v }
    }

    /// 分量取绝对值
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }

    /// 分量取最大值
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// 向量长度
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// 分量除法（按另一个向量逐分量缩放）
    pub fn per_component_div(self, other: Self) -> Self {
        Self::new(self.x / other.x, self.y / other.y)
    }

    /// 极角 `atan2(y, x)`，范围 (-π, π]
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<Vec2> for (f32, f32) {
    fn from(v: Vec2) -> Self {
        (v.x, v.y)
    }
}

/// 到矩形最近边的距离
///
/// 等价于 `min(左, 右, 上, 下)` 四个轴向距离，矩形内部为非负值。
pub fn distance_to_rect_edge(p: Vec2, half_extent: Vec2) -> f32 {
    let d = half_extent - p.abs();
    d.x.min(d.y)
}

/// 圆角矩形有符号距离（内部为负，外部为正）
///
/// `length(max(|p| - (h - r), 0)) + min(max(dx, dy), 0) - r`
///
/// `radius` 会被限制在 `[0, min(hx, hy)]`，避免内矩形反转。
pub fn rounded_rect_sdf(p: Vec2, half_extent: Vec2, radius: f32) -> f32 {
    let r = radius.clamp(0.0, half_extent.x.min(half_extent.y).max(0.0));
    let d = p.abs() - (half_extent - Vec2::splat(r));
    let outside = d.max(Vec2::zero()).length();
    let inside = d.x.max(d.y).min(0.0);
    outside + inside - r
}

/// 像素相对中心的极角
pub fn center_angle(p: Vec2) -> f32 {
    p.angle()
}

/// 按半尺寸归一化后的极角
///
/// 非正方形表面上，先把坐标缩放到 [-1, 1]² 再取角度，
/// 这样波纹沿边框均匀分布而不是挤在短边上。
pub fn normalized_center_angle(p: Vec2, half_extent: Vec2) -> f32 {
    if half_extent.x <= 0.0 || half_extent.y <= 0.0 {
        return p.angle();
    }
    p.per_component_div(half_extent).angle()
}
