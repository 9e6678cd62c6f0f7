//! # Fade 模块
//!
//! 三段式不透明度包络：淡入 → 保持 → 淡出。
//!
//! 每帧都从触发时间戳重新计算，不累积误差；任何阶段重新触发都从淡入开始。

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{AnimationPhase, Easing, elapsed_since};
use crate::error::{FxResult, ensure_non_negative};

/// 阶段边界的时间容差（秒），吸收浮点累加带来的误差
const BOUNDARY_EPSILON: f64 = 1e-6;

/// 淡入淡出参数（秒）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FadeConfig {
    #[serde(default = "default_fade")]
    pub fade_in: f32,
    #[serde(default = "default_hold")]
    pub hold: f32,
    #[serde(default = "default_fade")]
    pub fade_out: f32,
    #[serde(default)]
    pub easing: Easing,
}

fn default_fade() -> f32 {
    0.3
}

fn default_hold() -> f32 {
    1.0
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            fade_in: default_fade(),
            hold: default_hold(),
            fade_out: default_fade(),
            easing: Easing::default(),
        }
    }
}

impl FadeConfig {
    /// 淡入淡出时长相同的配置
    pub fn symmetric(fade: f32, hold: f32) -> Self {
        Self {
            fade_in: fade,
            hold,
            fade_out: fade,
            easing: Easing::default(),
        }
    }

    /// 包络总时长
    pub fn total(&self) -> f32 {
        self.fade_in + self.hold + self.fade_out
    }

    /// 校验参数
    pub fn validate(&self) -> FxResult<()> {
        ensure_non_negative("fade.fade_in", self.fade_in)?;
        ensure_non_negative("fade.hold", self.hold)?;
        ensure_non_negative("fade.fade_out", self.fade_out)
    }
}

/// 三段式淡入淡出状态机
#[derive(Debug, Clone)]
pub struct FadeEnvelope {
    config: FadeConfig,
    opacity: f32,
    phase: AnimationPhase,
    triggered_at: Option<f64>,
}

impl FadeEnvelope {
    /// 创建包络，初始不透明度为 0
    pub fn new(config: FadeConfig) -> Self {
        Self {
            config,
            opacity: 0.0,
            phase: AnimationPhase::Idle,
            triggered_at: None,
        }
    }

    /// 触发（或从任意阶段重新开始）
    pub fn trigger(&mut self, now: f64) {
        self.triggered_at = Some(now);
        self.phase = AnimationPhase::Rising;
    }

    /// 推进到 `now`
    pub fn advance(&mut self, now: f64) {
        let Some(triggered_at) = self.triggered_at else {
            self.opacity = 0.0;
            self.phase = AnimationPhase::Idle;
            return;
        };

        let elapsed = elapsed_since(triggered_at, now) + BOUNDARY_EPSILON;
        let fade_in = self.config.fade_in as f64;
        let hold_end = fade_in + self.config.hold as f64;
        let total = hold_end + self.config.fade_out as f64;
        let easing = self.config.easing;

        let (opacity, phase) = if elapsed < fade_in {
            (
                easing.apply((elapsed / fade_in) as f32),
                AnimationPhase::Rising,
            )
        } else if elapsed < hold_end {
            (1.0, AnimationPhase::Holding)
        } else if elapsed < total {
            let t = ((elapsed - hold_end) / self.config.fade_out as f64) as f32;
            (1.0 - easing.apply(t), AnimationPhase::Falling)
        } else {
            trace!(elapsed, "淡出结束，重置包络");
            self.triggered_at = None;
            (0.0, AnimationPhase::Idle)
        };

        self.opacity = opacity.clamp(0.0, 1.0);
        self.phase = phase;
    }

    /// 当前不透明度
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// 当前阶段
    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    /// 是否仍在播放
    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    /// 最近一次触发的时间戳（Idle 时为 None）
    pub fn triggered_at(&self) -> Option<f64> {
        self.triggered_at
    }

    /// 参数
    pub fn config(&self) -> &FadeConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fade() -> FadeEnvelope {
        FadeEnvelope::new(FadeConfig::default())
    }

    fn sample(envelope: &mut FadeEnvelope, now: f64) -> f32 {
        envelope.advance(now);
        envelope.opacity()
    }

    #[test]
    fn test_fade_scenario() {
        let mut f = fade();
        f.trigger(0.0);
        assert!((sample(&mut f, 0.15) - 0.5).abs() < 1e-4);
        assert!((sample(&mut f, 0.3) - 1.0).abs() < 1e-4);
        assert!((sample(&mut f, 1.3) - 1.0).abs() < 1e-4);
        assert!((sample(&mut f, 1.45) - 0.5).abs() < 1e-4);
        assert_eq!(sample(&mut f, 1.6), 0.0);
        assert_eq!(f.phase(), AnimationPhase::Idle);
        assert!(f.triggered_at().is_none());
    }

    #[test]
    fn test_phase_sequence() {
        let mut f = fade();
        f.trigger(0.0);
        let phases: Vec<_> = [0.0, 0.1, 0.5, 1.0, 1.4, 1.7]
            .into_iter()
            .map(|t| {
                f.advance(t);
                f.phase()
            })
            .collect();
        insta::assert_debug_snapshot!(phases, @r"
        [
            Rising,
            Rising,
            Holding,
            Holding,
            Falling,
            Idle,
        ]
        ");
    }

    #[test]
    fn test_opacity_is_continuous() {
        let mut f = fade();
        f.trigger(0.0);
        let step = 1.0 / 240.0;
        let mut prev = sample(&mut f, 0.0);
        let mut t = step;
        while t < 1.7 {
            let cur = sample(&mut f, t);
            // 斜率上限 1/0.3 每秒
            assert!((cur - prev).abs() <= (step / 0.3) as f32 + 1e-3);
            assert!((0.0..=1.0).contains(&cur));
            prev = cur;
            t += step;
        }
    }

    #[test]
    fn test_retrigger_during_hold_restarts_rising() {
        let mut f = fade();
        f.trigger(0.0);
        f.advance(0.8);
        assert_eq!(f.phase(), AnimationPhase::Holding);

        f.trigger(0.8);
        f.advance(0.8);
        assert_eq!(f.phase(), AnimationPhase::Rising);
        assert!(f.opacity() < 0.01);
        assert!((sample(&mut f, 0.95) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_zero_durations() {
        let mut f = FadeEnvelope::new(FadeConfig::symmetric(0.0, 0.5));
        f.trigger(0.0);
        assert_eq!(sample(&mut f, 0.0), 1.0);
        assert_eq!(f.phase(), AnimationPhase::Holding);
        assert_eq!(sample(&mut f, 0.5), 0.0);
        assert!(!f.is_active());
    }

    #[test]
    fn test_asymmetric_fade() {
        let mut f = FadeEnvelope::new(FadeConfig {
            fade_in: 0.1,
            hold: 0.0,
            fade_out: 1.0,
            easing: Easing::Linear,
        });
        f.trigger(0.0);
        assert!((sample(&mut f, 0.6) - 0.5).abs() < 1e-4);
        assert_eq!(f.phase(), AnimationPhase::Falling);
    }

    #[test]
    fn test_validate_rejects_negative() {
        assert!(FadeConfig::default().validate().is_ok());
        assert!(FadeConfig::symmetric(-0.1, 1.0).validate().is_err());
    }

    #[test]
    fn test_untriggered_stays_idle() {
        let mut f = fade();
        assert_eq!(sample(&mut f, 10.0), 0.0);
        assert_eq!(f.phase(), AnimationPhase::Idle);
    }
}
