//! # Pulse 模块
//!
//! 脉冲衰减：触发时瞬间升到峰值，然后按 `rest + (peak - rest)·exp(-k·t_ms)` 回落，
//! 距静息值小于阈值时吸附到静息值并回到 Idle。

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{AnimationPhase, elapsed_since};
use crate::error::{FxError, FxResult, ensure_positive};

/// 脉冲参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PulseConfig {
    /// 静息值
    #[serde(default = "default_rest")]
    pub rest: f32,
    /// 触发后的峰值
    #[serde(default = "default_peak")]
    pub peak: f32,
    /// 衰减率（每毫秒）
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f32,
    /// 吸附阈值
    #[serde(default = "default_snap_epsilon")]
    pub snap_epsilon: f32,
}

fn default_rest() -> f32 {
    10.0
}

fn default_peak() -> f32 {
    70.0
}

fn default_decay_rate() -> f32 {
    0.002
}

fn default_snap_epsilon() -> f32 {
    0.1
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            rest: default_rest(),
            peak: default_peak(),
            decay_rate: default_decay_rate(),
            snap_epsilon: default_snap_epsilon(),
        }
    }
}

impl PulseConfig {
    /// 校验参数
    ///
    /// 衰减率允许为 0（下一帧直接吸附），但必须是有限数。
    pub fn validate(&self) -> FxResult<()> {
        if !self.rest.is_finite() {
            return Err(FxError::invalid("pulse.rest", self.rest, "必须是有限数"));
        }
        if !self.peak.is_finite() {
            return Err(FxError::invalid("pulse.peak", self.peak, "必须是有限数"));
        }
        if !self.decay_rate.is_finite() {
            return Err(FxError::invalid(
                "pulse.decay_rate",
                self.decay_rate,
                "必须是有限数",
            ));
        }
        ensure_positive("pulse.snap_epsilon", self.snap_epsilon)
    }
}

/// 脉冲衰减状态机
///
/// 阶段：Idle → Rising（瞬时）→ Falling → Idle。
/// 值始终位于 `[min(rest, peak), max(rest, peak)]` 内。
#[derive(Debug, Clone)]
pub struct PulseDecay {
    config: PulseConfig,
    value: f32,
    phase: AnimationPhase,
    triggered_at: Option<f64>,
}

impl PulseDecay {
    /// 创建脉冲，初始值为静息值
    pub fn new(config: PulseConfig) -> Self {
        Self {
            value: config.rest,
            config,
            phase: AnimationPhase::Idle,
            triggered_at: None,
        }
    }

    /// 触发（或重新触发）
    ///
    /// 无论当前处于哪个阶段，都回到完整峰值。
    pub fn trigger(&mut self, now: f64) {
        self.value = self.config.peak;
        self.phase = AnimationPhase::Rising;
        self.triggered_at = Some(now);
    }

    /// 推进到 `now`
    pub fn advance(&mut self, now: f64) {
        let Some(triggered_at) = self.triggered_at else {
            self.value = self.config.rest;
            self.phase = AnimationPhase::Idle;
            return;
        };

        let PulseConfig {
            rest,
            peak,
            decay_rate,
            snap_epsilon,
        } = self.config;

        if decay_rate <= 0.0 {
            self.snap();
            return;
        }

        let elapsed_ms = elapsed_since(triggered_at, now) * 1000.0;
        let envelope = (-(decay_rate as f64) * elapsed_ms).exp() as f32;
        let value = rest + (peak - rest) * envelope;

        if (value - rest).abs() < snap_epsilon {
            trace!(elapsed_ms, "脉冲已回到静息值");
            self.snap();
            return;
        }

        self.value = value;
        self.phase = if elapsed_ms > 0.0 {
            AnimationPhase::Falling
        } else {
            AnimationPhase::Rising
        };
    }

    fn snap(&mut self) {
        self.value = self.config.rest;
        self.phase = AnimationPhase::Idle;
        self.triggered_at = None;
    }

    /// 当前值
    pub fn value(&self) -> f32 {
        self.value
    }

    /// 当前阶段
    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    /// 是否仍在衰减
    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    /// 最近一次触发的时间戳（Idle 时为 None）
    pub fn triggered_at(&self) -> Option<f64> {
        self.triggered_at
    }

    /// 参数
    pub fn config(&self) -> &PulseConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse() -> PulseDecay {
        PulseDecay::new(PulseConfig::default())
    }

    #[test]
    fn test_initial_state_is_rest() {
        let p = pulse();
        assert_eq!(p.value(), 10.0);
        assert_eq!(p.phase(), AnimationPhase::Idle);
        assert!(p.triggered_at().is_none());
    }

    #[test]
    fn test_pulse_scenario() {
        let mut p = pulse();
        p.trigger(0.0);
        p.advance(0.0);
        assert_eq!(p.value(), 70.0);
        assert_eq!(p.phase(), AnimationPhase::Rising);

        p.advance(0.5);
        let expected = 10.0 + 60.0 * (-1.0f32).exp();
        assert!((p.value() - expected).abs() < 1e-3);
        assert!((p.value() - 32.07).abs() < 0.01);
        assert_eq!(p.phase(), AnimationPhase::Falling);

        // 60·e^(-0.002·t) < 0.1 ⇔ t > ~3199ms
        p.advance(3.3);
        assert_eq!(p.value(), 10.0);
        assert_eq!(p.phase(), AnimationPhase::Idle);
        assert!(p.triggered_at().is_none());
    }

    #[test]
    fn test_decay_is_monotonic_and_converges() {
        let mut p = pulse();
        p.trigger(1.0);
        let mut prev = f32::INFINITY;
        let mut frames = 0;
        while p.is_active() || frames == 0 {
            p.advance(1.0 + frames as f64 / 60.0);
            assert!(p.value() <= prev);
            assert!((10.0..=70.0).contains(&p.value()));
            prev = p.value();
            frames += 1;
            assert!(frames < 60 * 10, "脉冲没有收敛");
        }
        assert_eq!(p.value(), 10.0);
    }

    #[test]
    fn test_retrigger_resets_to_peak() {
        let mut p = pulse();
        p.trigger(0.0);
        p.advance(0.2);
        assert!(p.value() < 70.0);

        p.trigger(0.2);
        assert_eq!(p.value(), 70.0);
        p.advance(0.2);
        assert_eq!(p.value(), 70.0);
        assert_eq!(p.triggered_at(), Some(0.2));
    }

    #[test]
    fn test_clock_before_trigger_clamps() {
        let mut p = pulse();
        p.trigger(5.0);
        p.advance(4.0);
        assert_eq!(p.value(), 70.0);
    }

    #[test]
    fn test_zero_decay_snaps() {
        let mut p = PulseDecay::new(PulseConfig {
            decay_rate: 0.0,
            ..PulseConfig::default()
        });
        p.trigger(0.0);
        p.advance(0.016);
        assert_eq!(p.value(), 10.0);
        assert!(!p.is_active());
    }

    #[test]
    fn test_inverted_pulse_stays_in_range() {
        let mut p = PulseDecay::new(PulseConfig {
            rest: 1.0,
            peak: 0.0,
            ..PulseConfig::default()
        });
        p.trigger(0.0);
        for i in 0..200 {
            p.advance(i as f64 * 0.016);
            assert!((0.0..=1.0).contains(&p.value()));
        }
    }

    #[test]
    fn test_validate() {
        assert!(PulseConfig::default().validate().is_ok());
        let bad = PulseConfig {
            snap_epsilon: 0.0,
            ..PulseConfig::default()
        };
        assert!(bad.validate().is_err());
        let bad = PulseConfig {
            peak: f32::INFINITY,
            ..PulseConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
