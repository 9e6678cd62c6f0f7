//! # Renderer 模块
//!
//! 软件渲染器：把一帧的 [`ShadingParams`] 和存活粒子合成为 [`PixelBuffer`]。
//!
//! ## 合成顺序
//!
//! 1. 边框发光（source-over）
//! 2. 旋涡层（source-over）
//! 3. 粒子（默认加法混合，叠加在最上层）

mod pixel_buffer;
pub mod shading;

pub use pixel_buffer::{BlendMode, PixelBuffer};

use flurp_runtime::{ParticleBatch, Vec2, vignette};
use tracing::trace;

use crate::surface::{ParticleShading, ShadingParams};
use shading::{border_pixel, half_extent, pixel_position, swirl_pixel};

/// 渲染一帧
///
/// 分辨率为 0 时返回 None（跳过绘制）。
pub fn render(
    params: &ShadingParams,
    particles: Option<&ParticleBatch>,
    now: f64,
) -> Option<PixelBuffer> {
    let resolution = params.resolution;
    if resolution.is_empty() {
        return None;
    }

    let mut buffer = PixelBuffer::new(resolution.width, resolution.height);
    let half = half_extent(resolution);

    if params.border.is_some() || params.swirl.is_some() {
        for y in 0..resolution.height {
            for x in 0..resolution.width {
                if let Some(border) = &params.border {
                    let p = pixel_position(x, y, resolution);
                    let color = border_pixel(border, params.color, p, half, params.time);
                    buffer.blend(x.into(), y.into(), color, BlendMode::Over);
                }
                if let Some(swirl) = &params.swirl {
                    let color = swirl_pixel(swirl, params.color, x, y, resolution, params.time);
                    buffer.blend(x.into(), y.into(), color, BlendMode::Over);
                }
            }
        }
    }

    if let (Some(shading), Some(batch)) = (&params.particles, particles)
        && !batch.is_expired(now)
    {
        draw_particles(&mut buffer, shading, batch, half, now);
    }

    Some(buffer)
}

/// 以点精灵方式绘制粒子
///
/// 粒子坐标以表面中心为原点、y 轴向下，与像素行方向一致。
fn draw_particles(
    buffer: &mut PixelBuffer,
    shading: &ParticleShading,
    batch: &ParticleBatch,
    half: Vec2,
    now: f64,
) {
    let mode = if shading.additive {
        BlendMode::Additive
    } else {
        BlendMode::Over
    };
    let size = shading.point_size.max(1.0);
    let span = size.ceil() as i64;

    let mut drawn = 0usize;
    for pos in batch.positions_at(now) {
        let r = pos.per_component_div(half).length();
        let alpha = vignette(r, shading.vignette_width);
        if alpha <= 0.0 {
            continue;
        }
        let color = shading.color.with_alpha(alpha);
        let x0 = (half.x + pos.x - size * 0.5).floor() as i64;
        let y0 = (half.y + pos.y - size * 0.5).floor() as i64;
        for dy in 0..span {
            for dx in 0..span {
                buffer.blend(x0 + dx, y0 + dy, color, mode);
            }
        }
        drawn += 1;
    }
    trace!(drawn, total = batch.len(), "粒子绘制完成");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EffectConfig, Preset};
    use crate::surface::{EffectSurface, Resolution, SurfaceId};
    use flurp_runtime::{Rgb, TriggerKind};

    fn surface(preset: Preset, width: u32, height: u32) -> EffectSurface {
        let mut surface = EffectSurface::new(
            SurfaceId(0),
            EffectConfig {
                seed: Some(3),
                ..preset.config()
            },
        );
        surface.observe_size(width, height);
        surface
    }

    #[test]
    fn test_empty_resolution_skips() {
        let mut s = surface(Preset::EdgePulse, 0, 0);
        let params = s.advance(0.0);
        assert_eq!(params.resolution, Resolution::default());
        assert!(render(&params, None, 0.0).is_none());
    }

    #[test]
    fn test_rest_border_lights_only_the_rim() {
        let mut s = surface(Preset::EdgePulse, 200, 100);
        let params = s.advance(0.0);
        let frame = render(&params, None, 0.0).unwrap();
        assert_eq!((frame.width(), frame.height()), (200, 100));
        // 静息宽度 10：中心透明，边缘可见
        assert!(frame.get(100, 50).unwrap().is_transparent());
        assert!(frame.get(0, 50).unwrap().a > 0.9);
    }

    #[test]
    fn test_rim_pixel_carries_base_color() {
        let mut s = surface(Preset::EdgePulse, 200, 100);
        let frame = render(&s.advance(0.0), None, 0.0).unwrap();
        for x in [0, 2, 197] {
            let p = frame.get(x, 50).unwrap();
            assert!(p.a > 0.0);
            let rgb = p.rgb();
            let cyan = Rgb::CYAN;
            assert!((rgb.r - cyan.r).abs() < 1e-4);
            assert!((rgb.g - cyan.g).abs() < 1e-4);
            assert!((rgb.b - cyan.b).abs() < 1e-4);
        }
    }

    #[test]
    fn test_particle_pixels_keep_particle_color() {
        let mut s = surface(Preset::Explosion, 200, 100);
        s.queue_trigger(TriggerKind::Click);
        let params = s.advance(0.0);
        let frame = render(&params, s.particles(), 0.0).unwrap();
        let red = s.config().particles.color.r;

        let lit: Vec<_> = frame.pixels().iter().filter(|p| !p.is_transparent()).collect();
        assert!(!lit.is_empty());
        for p in lit {
            // 重叠粒子只会更亮，不会变暗
            assert!(p.r >= red - 1e-4, "{p:?}");
            assert!(p.g.abs() < 1e-6 && p.b.abs() < 1e-6);
        }
    }

    #[test]
    fn test_pulse_widens_glow() {
        let mut s = surface(Preset::EdgePulse, 200, 100);
        let rest = render(&s.advance(0.0), None, 0.0).unwrap().lit_pixel_count();
        s.queue_trigger(TriggerKind::Click);
        let peak = render(&s.advance(0.1), None, 0.1).unwrap().lit_pixel_count();
        assert!(peak > rest);
    }

    #[test]
    fn test_particles_drawn_then_gone() {
        let mut s = surface(Preset::Explosion, 200, 100);
        s.queue_trigger(TriggerKind::Click);
        let params = s.advance(0.0);
        let frame = render(&params, s.particles(), 0.0).unwrap();
        assert_eq!((frame.width(), frame.height()), (240, 140));
        assert!(frame.lit_pixel_count() > 0);

        let params = s.advance(1.0);
        assert!(s.particles().is_none());
        let frame = render(&params, s.particles(), 1.0).unwrap();
        assert!(frame.is_clear());
    }

    #[test]
    fn test_swirl_fade_preset_is_white() {
        let mut s = surface(Preset::SwirlFade, 40, 20);
        s.queue_trigger(TriggerKind::Mount);
        s.advance(0.0);
        let frame = render(&s.advance(0.5), None, 0.5).unwrap();
        let p = frame.get(10, 10).unwrap();
        assert!((p.a - 1.0).abs() < 1e-6);
        assert!((p.r - p.g).abs() < 1e-5 && (p.g - p.b).abs() < 1e-5);
    }

    #[test]
    fn test_idle_swirl_is_clear() {
        let mut s = surface(Preset::SwirlFade, 40, 20);
        let frame = render(&s.advance(5.0), None, 5.0).unwrap();
        assert!(frame.is_clear());
    }
}
