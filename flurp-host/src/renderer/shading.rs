//! # Shading 模块
//!
//! 逐像素着色函数，对应片段着色器的 CPU 实现。
//!
//! 坐标约定：像素在中心采样，转换为以表面中心为原点、y 轴向上的坐标。

use flurp_runtime::{
    Rgb, Rgba, Vec2, blend_tones, border_alpha, center_angle, distance_to_rect_edge,
    normalized_center_angle, rounded_rect_sdf,
};

use crate::surface::{BorderShading, Resolution, SwirlShading};

/// 旋涡亮度分母下限，避免 `|sin| = 0` 时除零
const SWIRL_MIN_DENOMINATOR: f32 = 1e-3;

/// 像素 (x, y) 中心相对表面中心的坐标（y 向上）
pub fn pixel_position(x: u32, y: u32, resolution: Resolution) -> Vec2 {
    let w = resolution.width as f32;
    let h = resolution.height as f32;
    Vec2::new(x as f32 + 0.5 - w * 0.5, h * 0.5 - (y as f32 + 0.5))
}

/// 表面半尺寸
pub fn half_extent(resolution: Resolution) -> Vec2 {
    Vec2::new(
        resolution.width as f32 * 0.5,
        resolution.height as f32 * 0.5,
    )
}

/// 边框像素颜色
pub fn border_pixel(border: &BorderShading, base: Rgb, p: Vec2, half: Vec2, t: f32) -> Rgba {
    match *border {
        BorderShading::EdgeGlow { width, wave } => {
            let d = distance_to_rect_edge(p, half);
            let w = wave.modulated_width(width, center_angle(p), t);
            base.with_alpha(border_alpha(d, w))
        }
        BorderShading::DualTone {
            width,
            primary,
            secondary,
            secondary_color,
            mix,
        } => {
            let d = distance_to_rect_edge(p, half);
            let angle = center_angle(p);
            let a1 = border_alpha(d, primary.modulated_width(width, angle, t));
            let a2 = border_alpha(d, secondary.modulated_width(width, angle, t));
            blend_tones(mix, base, a1, secondary_color, a2)
        }
        BorderShading::Button {
            inset,
            corner_radius,
            primary,
            secondary,
            secondary_color,
            mix,
        } => {
            let inner = half - Vec2::splat(inset);
            if inner.x <= 0.0 || inner.y <= 0.0 {
                return Rgba::TRANSPARENT;
            }
            let d = rounded_rect_sdf(p, inner, corner_radius).abs();
            let angle = normalized_center_angle(p, inner);
            let a1 = border_alpha(d, primary.modulated_width(inset, angle, t));
            let a2 = border_alpha(d, secondary.modulated_width(inset, angle, t));
            blend_tones(mix, base, a1, secondary_color, a2)
        }
    }
}

/// 旋涡像素颜色
///
/// 坐标先映射到 `(2u − aspect, 2v − 1)`，再做多次余弦扭曲，
/// 亮度为 `intensity / |sin(t − uv.y − uv.x)|`。
pub fn swirl_pixel(
    swirl: &SwirlShading,
    base: Rgb,
    x: u32,
    y: u32,
    resolution: Resolution,
    t: f32,
) -> Rgba {
    if swirl.opacity <= 0.0 {
        return Rgba::TRANSPARENT;
    }

    let w = resolution.width as f32;
    let h = resolution.height as f32;
    let u = (x as f32 + 0.5) / w;
    let v = 1.0 - (y as f32 + 0.5) / h;
    let mut uv = Vec2::new(2.0 * u - w / h, 2.0 * v - 1.0);

    let config = swirl.config;
    for i in 1..=config.iterations {
        let i = i as f32;
        uv.x += config.warp / i * (i * 2.5 * uv.y + t).cos();
        uv.y += config.warp / i * (i * 1.5 * uv.x + t).cos();
    }

    let brightness =
        config.intensity / (t - uv.y - uv.x).sin().abs().max(SWIRL_MIN_DENOMINATOR);
    let tint = base.scale(brightness);
    Rgba::new(
        tint.r.min(1.0),
        tint.g.min(1.0),
        tint.b.min(1.0),
        swirl.opacity,
    )
}
