//! # Surface 模块
//!
//! 效果表面：一个 UI 元素上的绘制区域，独占自己的动画状态与粒子批次。
//!
//! ## 每帧流程
//!
//! 1. 应用上一帧之后排队的触发（以本帧 `now` 为触发时间）
//! 2. 把脉冲 / 淡入淡出 / 粒子推进到 `now`
//! 3. 输出纯值的 [`ShadingParams`]，交给渲染器逐像素求值
//!
//! 分辨率总是等于最近一次观测到的元素尺寸加上两倍留白。

use std::fmt;

use flurp_runtime::{
    ExplosionEmitter, FadeEnvelope, InteractionState, InteractionTable, ParticleBatch, PulseDecay,
    Rgb, SpawnArea, ToneMix, TriggerAction, TriggerKind, WaveOscillator, WaveParams,
};
use tracing::debug;

use crate::config::{BorderStyle, EffectConfig, SwirlConfig};

/// 表面 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u32);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// 像素分辨率
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// 任一维度为 0
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// 一帧的边框着色参数（波纹已按交互状态缩放）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BorderShading {
    EdgeGlow {
        width: f32,
        wave: WaveParams,
    },
    DualTone {
        width: f32,
        primary: WaveParams,
        secondary: WaveParams,
        secondary_color: Rgb,
        mix: ToneMix,
    },
    Button {
        inset: f32,
        corner_radius: f32,
        primary: WaveParams,
        secondary: WaveParams,
        secondary_color: Rgb,
        mix: ToneMix,
    },
}

/// 一帧的旋涡着色参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwirlShading {
    pub opacity: f32,
    pub config: SwirlConfig,
}

/// 一帧的粒子着色参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleShading {
    pub color: Rgb,
    pub point_size: f32,
    pub additive: bool,
    pub vignette_width: f32,
}

/// 推送给渲染器的逐帧参数
///
/// 纯值结构，每帧重新生成，渲染器不持有任何可变状态。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingParams {
    /// 帧时间（秒）
    pub time: f32,
    pub resolution: Resolution,
    pub color: Rgb,
    pub border: Option<BorderShading>,
    pub swirl: Option<SwirlShading>,
    pub particles: Option<ParticleShading>,
}

/// 边框的波纹振荡器
#[derive(Debug, Clone)]
enum BorderWaves {
    EdgeGlow(WaveOscillator),
    DualTone {
        primary: WaveOscillator,
        secondary: WaveOscillator,
        secondary_color: Rgb,
        mix: ToneMix,
    },
    Button {
        inset: f32,
        corner_radius: f32,
        primary: WaveOscillator,
        secondary: WaveOscillator,
        secondary_color: Rgb,
        mix: ToneMix,
    },
}

impl BorderWaves {
    fn from_style(style: &BorderStyle) -> Self {
        let fixed = |wave: WaveParams| WaveOscillator::new(wave, InteractionTable::default());
        match *style {
            BorderStyle::EdgeGlow { wave } => Self::EdgeGlow(fixed(wave)),
            BorderStyle::DualTone {
                primary,
                secondary,
                secondary_color,
                mix,
            } => Self::DualTone {
                primary: fixed(primary),
                secondary: fixed(secondary),
                secondary_color,
                mix,
            },
            BorderStyle::Button {
                inset,
                corner_radius,
                primary,
                secondary,
                secondary_color,
                mix,
                interaction,
            } => Self::Button {
                inset,
                corner_radius,
                primary: WaveOscillator::new(primary, interaction),
                secondary: WaveOscillator::new(secondary, interaction),
                secondary_color,
                mix,
            },
        }
    }

    fn set_interaction(&mut self, state: InteractionState) {
        match self {
            Self::EdgeGlow(wave) => wave.set_state(state),
            Self::DualTone {
                primary, secondary, ..
            }
            | Self::Button {
                primary, secondary, ..
            } => {
                primary.set_state(state);
                secondary.set_state(state);
            }
        }
    }

    fn shading(&self, pulse_width: f32) -> BorderShading {
        match self {
            Self::EdgeGlow(wave) => BorderShading::EdgeGlow {
                width: pulse_width,
                wave: wave.params(),
            },
            Self::DualTone {
                primary,
                secondary,
                secondary_color,
                mix,
            } => BorderShading::DualTone {
                width: pulse_width,
                primary: primary.params(),
                secondary: secondary.params(),
                secondary_color: *secondary_color,
                mix: *mix,
            },
            Self::Button {
                inset,
                corner_radius,
                primary,
                secondary,
                secondary_color,
                mix,
            } => BorderShading::Button {
                inset: *inset,
                corner_radius: *corner_radius,
                primary: primary.params(),
                secondary: secondary.params(),
                secondary_color: *secondary_color,
                mix: *mix,
            },
        }
    }
}

/// 效果表面
#[derive(Debug, Clone)]
pub struct EffectSurface {
    id: SurfaceId,
    config: EffectConfig,
    element: Resolution,
    resolution: Resolution,
    pulse: PulseDecay,
    fade: FadeEnvelope,
    border: Option<BorderWaves>,
    interaction: InteractionState,
    emitter: ExplosionEmitter,
    pending: Vec<TriggerKind>,
}

impl EffectSurface {
    /// 创建表面，动画状态全部处于静息值
    pub fn new(id: SurfaceId, config: EffectConfig) -> Self {
        // 同一配置的多个表面使用不同的随机序列
        let seed = config.seed.map(|seed| seed.wrapping_add(u64::from(id.0)));
        Self {
            id,
            pulse: PulseDecay::new(config.pulse),
            fade: FadeEnvelope::new(config.fade),
            border: config.border.as_ref().map(BorderWaves::from_style),
            interaction: InteractionState::Normal,
            emitter: ExplosionEmitter::new(config.particles, seed),
            element: Resolution::default(),
            resolution: Resolution::default(),
            pending: Vec::new(),
            config,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// 当前分辨率（元素尺寸 + 2·padding）
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// 记录新的元素尺寸，返回分辨率是否变化
    ///
    /// 任一维度为 0 时分辨率为 0×0，本帧跳过绘制。
    pub fn observe_size(&mut self, width: u32, height: u32) -> bool {
        self.element = Resolution::new(width, height);
        let resolution = if self.element.is_empty() {
            Resolution::default()
        } else {
            let pad = (self.config.padding.max(0.0) * 2.0).round() as u32;
            Resolution::new(width.saturating_add(pad), height.saturating_add(pad))
        };

        let changed = resolution != self.resolution;
        if changed {
            debug!(
                surface = %self.id,
                width = resolution.width,
                height = resolution.height,
                "表面分辨率变化"
            );
        }
        self.resolution = resolution;
        changed
    }

    /// 排队一个触发，在下一次 `advance` 开始时生效
    pub fn queue_trigger(&mut self, kind: TriggerKind) {
        self.pending.push(kind);
    }

    /// 推进到 `now` 并生成着色参数
    pub fn advance(&mut self, now: f64) -> ShadingParams {
        let pending = std::mem::take(&mut self.pending);
        for kind in pending {
            self.apply_trigger(kind, now);
        }

        self.pulse.advance(now);
        self.fade.advance(now);
        self.emitter.advance(now);

        self.shading_params(now)
    }

    fn apply_trigger(&mut self, kind: TriggerKind, now: f64) {
        let actions: Vec<TriggerAction> = self.config.bindings.actions_for(kind).collect();
        if actions.is_empty() {
            debug!(surface = %self.id, kind = kind.name(), "触发未绑定任何动作");
        }

        for action in actions {
            match action {
                TriggerAction::Pulse => self.pulse.trigger(now),
                TriggerAction::Fade => self.fade.trigger(now),
                TriggerAction::Explode => {
                    if !self.config.explosion {
                        continue;
                    }
                    let area = SpawnArea::centered(
                        self.element.width as f32,
                        self.element.height as f32,
                    );
                    self.emitter.trigger(now, area);
                }
                TriggerAction::Interaction(state) => {
                    self.interaction = state;
                    if let Some(border) = &mut self.border {
                        border.set_interaction(state);
                    }
                }
            }
        }
    }

    fn shading_params(&self, now: f64) -> ShadingParams {
        let particles = self.config.explosion.then(|| {
            let config = self.emitter.config();
            ParticleShading {
                color: config.color,
                point_size: config.point_size,
                additive: config.additive,
                vignette_width: config.vignette_width,
            }
        });

        ShadingParams {
            time: now as f32,
            resolution: self.resolution,
            color: self.config.color,
            border: self
                .border
                .as_ref()
                .map(|waves| waves.shading(self.pulse.value())),
            swirl: self.config.swirl.map(|config| SwirlShading {
                opacity: self.fade.opacity(),
                config,
            }),
            particles,
        }
    }

    /// 存活的粒子批次
    pub fn particles(&self) -> Option<&ParticleBatch> {
        self.emitter.batch()
    }

    pub fn pulse(&self) -> &PulseDecay {
        &self.pulse
    }

    pub fn fade(&self) -> &FadeEnvelope {
        &self.fade
    }

    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    /// 是否有动画仍在进行（粒子、脉冲或淡入淡出）
    pub fn is_animating(&self) -> bool {
        self.pulse.is_active() || self.fade.is_active() || self.emitter.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use flurp_runtime::AnimationPhase;

    fn surface(preset: Preset) -> EffectSurface {
        let config = EffectConfig {
            seed: Some(42),
            ..preset.config()
        };
        EffectSurface::new(SurfaceId(1), config)
    }

    #[test]
    fn test_resolution_follows_size_and_padding() {
        let mut s = surface(Preset::Explosion);
        assert!(s.observe_size(200, 100));
        assert_eq!(s.resolution(), Resolution::new(240, 140));
        assert!(!s.observe_size(200, 100));
        assert!(s.observe_size(0, 100));
        assert!(s.resolution().is_empty());
    }

    #[test]
    fn test_trigger_applies_on_next_advance() {
        let mut s = surface(Preset::EdgePulse);
        s.observe_size(800, 600);
        s.queue_trigger(TriggerKind::Click);
        // 排队不会立刻改变状态
        assert_eq!(s.pulse().value(), 10.0);

        let params = s.advance(2.0);
        assert_eq!(s.pulse().triggered_at(), Some(2.0));
        match params.border {
            Some(BorderShading::EdgeGlow { width, .. }) => assert_eq!(width, 70.0),
            other => panic!("unexpected border: {other:?}"),
        }

        let params = s.advance(2.5);
        match params.border {
            Some(BorderShading::EdgeGlow { width, .. }) => assert!((width - 32.07).abs() < 0.01),
            other => panic!("unexpected border: {other:?}"),
        }
    }

    #[test]
    fn test_explode_only_when_enabled() {
        let mut edge = surface(Preset::EdgePulse);
        edge.observe_size(100, 100);
        edge.queue_trigger(TriggerKind::Click);
        edge.advance(0.0);
        assert!(edge.particles().is_none());

        let mut boom = surface(Preset::Explosion);
        boom.observe_size(100, 100);
        boom.queue_trigger(TriggerKind::Click);
        boom.advance(0.0);
        assert_eq!(boom.particles().map(ParticleBatch::len), Some(1000));
        assert!(boom.is_animating());
    }

    #[test]
    fn test_particles_spawn_inside_element_box() {
        let mut s = surface(Preset::Explosion);
        s.observe_size(200, 100);
        s.queue_trigger(TriggerKind::Click);
        s.advance(0.0);
        let batch = s.particles().unwrap();
        for p in batch.particles() {
            assert!(p.origin.x.abs() <= 100.0);
            assert!(p.origin.y.abs() <= 50.0);
        }
    }

    #[test]
    fn test_interaction_scales_button_waves() {
        let mut s = surface(Preset::Button);
        s.observe_size(128, 48);

        let amplitude = |params: ShadingParams| match params.border {
            Some(BorderShading::Button { primary, secondary, .. }) => {
                (primary.amplitude, secondary.amplitude)
            }
            other => panic!("unexpected border: {other:?}"),
        };

        let (a, b) = amplitude(s.advance(0.0));
        assert!((a - 0.2).abs() < 1e-6);
        assert!((b - 0.14).abs() < 1e-6);

        s.queue_trigger(TriggerKind::HoverEnter);
        let (a, _) = amplitude(s.advance(0.1));
        assert!((a - 0.4).abs() < 1e-6);
        assert_eq!(s.interaction(), InteractionState::Hovered);

        s.queue_trigger(TriggerKind::Press);
        let (a, _) = amplitude(s.advance(0.2));
        assert!((a - 0.8).abs() < 1e-6);

        s.queue_trigger(TriggerKind::Release);
        s.queue_trigger(TriggerKind::HoverLeave);
        let (a, _) = amplitude(s.advance(0.3));
        assert!((a - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_swirl_follows_fade() {
        let mut s = surface(Preset::SwirlFade);
        s.observe_size(64, 64);
        s.queue_trigger(TriggerKind::Mount);
        s.advance(0.0);
        let opacity = s.advance(0.15).swirl.map(|swirl| swirl.opacity).unwrap();
        assert!((opacity - 0.5).abs() < 1e-3);
        assert_eq!(s.fade().phase(), AnimationPhase::Rising);
        let opacity = s.advance(2.0).swirl.map(|swirl| swirl.opacity).unwrap();
        assert_eq!(opacity, 0.0);
        assert!(!s.is_animating());
    }
}
