//! # Flurp Runtime
//!
//! 边框发光 / 粒子爆炸效果引擎的数值核心。
//!
//! ## 架构概述
//!
//! `flurp-runtime` 是纯逻辑核心，不依赖任何 IO 或渲染目标。
//! 宿主层（Host）每帧用单调时钟推进状态，再把结果当作着色参数使用：
//!
//! ```text
//! Host                              Runtime
//!   │                                  │
//!   │──── trigger(now) ──────────────►│  PulseDecay / FadeEnvelope / ExplosionEmitter
//!   │──── advance(now) ──────────────►│
//!   │◄─── value / opacity / positions ─│
//!   │                                  │
//!   │  逐像素：sdf → border_alpha       │
//! ```
//!
//! ## 核心类型
//!
//! - [`Vec2`]、[`distance_to_rect_edge`]、[`rounded_rect_sdf`]：距离场
//! - [`border_alpha`]、[`WaveParams`]、[`ToneMix`]：边框强度模型
//! - [`PulseDecay`]、[`FadeEnvelope`]、[`WaveOscillator`]：动画状态机
//! - [`ExplosionEmitter`]、[`ParticleBatch`]：粒子爆炸
//! - [`TriggerBindings`]：UI 事件到动作的映射
//!
//! ## 模块结构
//!
//! - [`sdf`]：距离场函数
//! - [`border`]：边框 alpha 与角度波纹
//! - [`color`]：颜色类型与解析
//! - [`animation`]：动画状态机
//! - [`particles`]：粒子模拟
//! - [`trigger`]：事件绑定
//! - [`error`]：错误类型定义

pub mod animation;
pub mod border;
pub mod color;
pub mod error;
pub mod particles;
pub mod sdf;
pub mod trigger;

// 重导出核心类型
pub use animation::{
    AnimationPhase, Easing, FadeConfig, FadeEnvelope, InteractionEntry, InteractionState,
    InteractionTable, PulseConfig, PulseDecay, WaveOscillator,
};
pub use border::{ToneMix, WaveForm, WaveParams, blend_tones, border_alpha, smoothstep};
pub use color::{Rgb, Rgba};
pub use error::{FxError, FxResult};
pub use particles::{ExplosionEmitter, Particle, ParticleBatch, ParticleConfig, SpawnArea, vignette};
pub use sdf::{
    Vec2, center_angle, distance_to_rect_edge, normalized_center_angle, rounded_rect_sdf,
};
pub use trigger::{TriggerAction, TriggerBinding, TriggerBindings, TriggerKind};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        // 验证所有公共类型都可以正常使用
        let _pulse = PulseDecay::new(PulseConfig::default());
        let _fade = FadeEnvelope::new(FadeConfig::default());
        let _wave = WaveOscillator::new(WaveParams::default(), InteractionTable::button());
        let _emitter = ExplosionEmitter::new(ParticleConfig::default(), Some(1));
        let _bindings = TriggerBindings::default();
        let _color = Rgb::parse("#05C7CC");
    }

    #[test]
    fn test_edge_glow_pixel_pipeline() {
        // 800×600 表面，静息宽度 10：距右边缘 5px 的像素可见，中心不可见
        let half = Vec2::new(400.0, 300.0);
        let near_edge = Vec2::new(395.0, 0.0);
        let width = WaveParams::default().modulated_width(10.0, center_angle(near_edge), 0.0);
        assert!(border_alpha(distance_to_rect_edge(near_edge, half), width) > 0.0);
        assert_eq!(border_alpha(distance_to_rect_edge(Vec2::zero(), half), width), 0.0);
    }
}
