//! # Animation 模块
//!
//! CPU 侧的动画状态机，全部由显式的 `advance(now)` 驱动。
//!
//! ## 核心设计理念
//!
//! 动画值是**触发时间戳 + 当前时间**的纯函数：
//! - 不注册回调，不自我调度
//! - 每帧由外部时钟推进一次，状态只在 `advance` 中改变
//! - 重新触发只重置描述符（时间戳与阶段），不重新分配
//!
//! ## 核心概念
//!
//! - [`PulseDecay`]：瞬间升到峰值，再指数衰减回静息值
//! - [`FadeEnvelope`]：淡入 → 保持 → 淡出 的三段式不透明度
//! - [`WaveOscillator`]：永不停止的角度正弦波，振幅/速度由交互状态查表
//!
//! 时间单位：`now` 为秒（f64，单调递增）。脉冲衰减率按毫秒计。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let mut pulse = PulseDecay::new(PulseConfig::default());
//! pulse.trigger(now);
//! pulse.advance(now + 0.5);
//! let width = pulse.value();
//! ```

mod easing;
mod fade;
mod pulse;
mod wave;

pub use easing::Easing;
pub use fade::{FadeConfig, FadeEnvelope};
pub use pulse::{PulseConfig, PulseDecay};
pub use wave::{InteractionEntry, InteractionState, InteractionTable, WaveOscillator};

/// 动画阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationPhase {
    /// 静止，值等于静息值
    #[default]
    Idle,
    /// 上升（脉冲的瞬时上升，或淡入）
    Rising,
    /// 保持在峰值
    Holding,
    /// 回落（衰减或淡出）
    Falling,
}

impl AnimationPhase {
    /// 是否为活跃状态（需要逐帧推进）
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// 触发时刻之前的时间按 0 处理
fn elapsed_since(triggered_at: f64, now: f64) -> f64 {
    let elapsed = now - triggered_at;
    if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 }
}
