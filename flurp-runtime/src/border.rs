//! # Border 模块
//!
//! 边框强度模型：把"到边缘的距离"和"边框宽度"转换成模糊的 alpha 遮罩。
//!
//! ## 组成
//!
//! - `1 - smoothstep(0, width, d)`：平滑截止
//! - `exp(-d² / (2σ²))`，σ = 0.3·width：高斯衰减，让发光核心更锐利
//! - [`WaveParams`] / [`WaveForm`]：按角度调制宽度，产生"呼吸"边缘
//! - [`ToneMix`]：两道独立调制的波纹混合成双色边框

use serde::{Deserialize, Serialize};

use crate::color::{Rgb, Rgba};

/// 宽度下限，避免 σ = 0 时除零
pub const MIN_BORDER_WIDTH: f32 = 1e-4;

/// 高斯 σ 相对边框宽度的比例
pub const SIGMA_RATIO: f32 = 0.3;

/// 三次 Hermite 平滑阶跃
///
/// 两端导数为 0；`x` 超出 `[edge0, edge1]` 时被截断。
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 == edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// 边框 alpha
///
/// - `distance = 0` 时为 1
/// - `distance >= width` 时为 0
/// - `width <= 0` 时处处为 0
pub fn border_alpha(distance: f32, width: f32) -> f32 {
    if width.is_nan() || width <= 0.0 {
        return 0.0;
    }
    let width = width.max(MIN_BORDER_WIDTH);
    let intensity = 1.0 - smoothstep(0.0, width, distance);
    if intensity <= 0.0 {
        return 0.0;
    }
    let sigma = width * SIGMA_RATIO;
    let blur = (-(distance * distance) / (2.0 * sigma * sigma)).exp();
    (intensity * blur).clamp(0.0, 1.0)
}

/// 正弦样本转换为宽度系数的方式
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum WaveForm {
    /// `1 + a·s`：围绕基准宽度上下呼吸
    #[default]
    Breathing,
    /// `1 + a·(s + 1)`：只向外扩张
    Lifted,
    /// `(s + 1)·a + floor`：系数本身在 `[floor, floor + 2a]` 内摆动
    Floored { floor: f32 },
}

impl WaveForm {
    /// 把正弦样本 `s ∈ [-1, 1]` 映射为宽度系数
    pub fn factor(self, amplitude: f32, s: f32) -> f32 {
        match self {
            WaveForm::Breathing => 1.0 + amplitude * s,
            WaveForm::Lifted => 1.0 + amplitude * (s + 1.0),
            WaveForm::Floored { floor } => (s + 1.0) * amplitude + floor,
        }
    }
}

/// 一道角度波纹的参数
///
/// 采样值为 `sin(frequency·angle + speed·t + phase)`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveParams {
    #[serde(default)]
    pub form: WaveForm,
    pub amplitude: f32,
    pub frequency: f32,
    pub speed: f32,
    #[serde(default)]
    pub phase: f32,
}

impl WaveParams {
    /// 原始正弦样本
    pub fn sample(&self, angle: f32, t: f32) -> f32 {
        (self.frequency * angle + self.speed * t + self.phase).sin()
    }

    /// 角度调制后的宽度：`base · factor(amplitude, sample)`
    pub fn modulated_width(&self, base: f32, angle: f32, t: f32) -> f32 {
        base * self.form.factor(self.amplitude, self.sample(angle, t))
    }

    /// 按交互预设缩放振幅与速度
    pub fn scaled(self, amplitude_scale: f32, speed_scale: f32) -> Self {
        Self {
            amplitude: self.amplitude * amplitude_scale,
            speed: self.speed * speed_scale,
            ..self
        }
    }
}

impl Default for WaveParams {
    /// 单色脉冲边框的呼吸波纹：`1 + 0.3·sin(6θ + 8t)`
    fn default() -> Self {
        Self {
            form: WaveForm::Breathing,
            amplitude: 0.3,
            frequency: 6.0,
            speed: 8.0,
            phase: 0.0,
        }
    }
}

/// 双色边框的混合方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneMix {
    /// `mix(cA·αA, cB·αB, 0.5)`
    #[default]
    Average,
    /// `mix(cA, cB, αB / (αA + αB))`，两者都为 0 时输出透明黑
    Weighted,
}

/// 混合两道边框，合成 alpha 取两者最大值
pub fn blend_tones(mode: ToneMix, color_a: Rgb, alpha_a: f32, color_b: Rgb, alpha_b: f32) -> Rgba {
    let alpha = alpha_a.max(alpha_b);
    match mode {
        ToneMix::Average => color_a
            .scale(alpha_a)
            .mix(color_b.scale(alpha_b), 0.5)
            .with_alpha(alpha),
        ToneMix::Weighted => {
            let total = alpha_a + alpha_b;
            if total <= 0.0 {
                return Rgba::TRANSPARENT;
            }
            color_a.mix(color_b, alpha_b / total).with_alpha(alpha)
        }
    }
}
