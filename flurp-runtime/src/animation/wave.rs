//! # Wave 模块
//!
//! 连续角度波纹。振幅与速度由交互状态查表得到，状态切换即时生效。

use serde::{Deserialize, Serialize};

use crate::border::WaveParams;

/// 交互状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionState {
    #[default]
    Normal,
    Hovered,
    Pressed,
}

/// 某一交互状态下的振幅 / 速度倍率
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionEntry {
    pub amplitude: f32,
    pub speed: f32,
}

impl InteractionEntry {
    pub const fn new(amplitude: f32, speed: f32) -> Self {
        Self { amplitude, speed }
    }

    /// 倍率均为 1
    pub const fn identity() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// 交互状态查找表
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionTable {
    pub normal: InteractionEntry,
    pub hovered: InteractionEntry,
    pub pressed: InteractionEntry,
}

impl Default for InteractionTable {
    /// 不随交互变化
    fn default() -> Self {
        Self::uniform(InteractionEntry::identity())
    }
}

impl InteractionTable {
    /// 所有状态使用同一项
    pub const fn uniform(entry: InteractionEntry) -> Self {
        Self {
            normal: entry,
            hovered: entry,
            pressed: entry,
        }
    }

    /// 按钮预设：悬停加速，按下加大振幅
    pub const fn button() -> Self {
        Self {
            normal: InteractionEntry::new(0.2, 1.0),
            hovered: InteractionEntry::new(0.4, 2.0),
            pressed: InteractionEntry::new(0.8, 2.0),
        }
    }

    /// 查表
    pub fn get(&self, state: InteractionState) -> InteractionEntry {
        match state {
            InteractionState::Normal => self.normal,
            InteractionState::Hovered => self.hovered,
            InteractionState::Pressed => self.pressed,
        }
    }
}

/// 连续波纹振荡器
///
/// 没有 Idle 阶段，每帧都采样。
#[derive(Debug, Clone)]
pub struct WaveOscillator {
    base: WaveParams,
    table: InteractionTable,
    state: InteractionState,
}

impl WaveOscillator {
    pub fn new(base: WaveParams, table: InteractionTable) -> Self {
        Self {
            base,
            table,
            state: InteractionState::Normal,
        }
    }

    /// 切换交互状态
    pub fn set_state(&mut self, state: InteractionState) {
        self.state = state;
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// 应用交互倍率后的波纹参数
    pub fn params(&self) -> WaveParams {
        let entry = self.table.get(self.state);
        self.base.scaled(entry.amplitude, entry.speed)
    }

    /// `amplitude·sin(frequency·angle + speed·t + phase)`
    pub fn sample(&self, angle: f32, t: f32) -> f32 {
        let params = self.params();
        params.amplitude * params.sample(angle, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::border::WaveForm;

    fn button_wave() -> WaveOscillator {
        WaveOscillator::new(
            WaveParams {
                form: WaveForm::Floored { floor: 0.2 },
                amplitude: 1.0,
                frequency: 6.0,
                speed: 4.0,
                phase: 0.0,
            },
            InteractionTable::button(),
        )
    }

    #[test]
    fn test_interaction_switches_instantly() {
        let mut wave = button_wave();
        assert_eq!(wave.params().amplitude, 0.2);
        assert_eq!(wave.params().speed, 4.0);

        wave.set_state(InteractionState::Hovered);
        assert_eq!(wave.params().amplitude, 0.4);
        assert_eq!(wave.params().speed, 8.0);

        wave.set_state(InteractionState::Pressed);
        assert_eq!(wave.params().amplitude, 0.8);
        assert_eq!(wave.params().speed, 8.0);
    }

    #[test]
    fn test_sample_bounded_by_amplitude() {
        let mut wave = button_wave();
        wave.set_state(InteractionState::Pressed);
        for i in 0..100 {
            let s = wave.sample(i as f32 * 0.07, i as f32 * 0.016);
            assert!(s.abs() <= 0.8 + 1e-6);
        }
    }

    #[test]
    fn test_default_table_is_identity() {
        let wave = WaveOscillator::new(WaveParams::default(), InteractionTable::default());
        assert_eq!(wave.params(), WaveParams::default());
        assert_eq!(wave.sample(0.0, 0.0), 0.0);
    }
}
