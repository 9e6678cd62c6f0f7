//! # Clock 模块
//!
//! 帧时钟抽象。动画只依赖 `now()` 返回的单调秒数。

use std::cell::Cell;
use std::time::Instant;

/// 单调帧时钟（秒）
pub trait FrameClock {
    fn now(&self) -> f64;
}

/// 系统时钟，从创建时刻开始计时
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// 手动时钟（headless 渲染与测试）
///
/// 只能前进，不能回退。
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// 前进 `dt` 秒（负值与 NaN 被忽略）
    pub fn advance(&self, dt: f64) {
        if dt > 0.0 {
            self.now.set(self.now.get() + dt);
        }
    }

    /// 跳到 `t`，早于当前时间时保持不变
    pub fn set(&self, t: f64) {
        if t > self.now.get() {
            self.now.set(t);
        }
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}
