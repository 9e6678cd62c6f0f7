//! # Stage 模块
//!
//! 单线程帧循环：管理所有已挂载元素的效果表面，每帧推进并渲染。
//!
//! ## 生命周期
//!
//! - `mount`：登记元素和它的配置，此时还没有表面
//! - 第一次观测到非零尺寸：创建表面，并排队一次 `Mount` 触发
//! - 之后每次尺寸变化：同步分辨率
//! - `unmount`：销毁表面
//!
//! 对未知元素的触发和尺寸观测都是无害的空操作。

use std::collections::BTreeMap;

use flurp_runtime::TriggerKind;
use tracing::debug;

use crate::clock::FrameClock;
use crate::config::EffectConfig;
use crate::renderer::{PixelBuffer, render};
use crate::surface::{EffectSurface, SurfaceId};

/// 单个表面一帧的结果
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// 分辨率为 0 或尚未测量，跳过绘制
    Skipped,
    /// 已绘制
    Drawn(PixelBuffer),
}

impl FrameOutcome {
    pub fn buffer(&self) -> Option<&PixelBuffer> {
        match self {
            FrameOutcome::Drawn(buffer) => Some(buffer),
            FrameOutcome::Skipped => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, FrameOutcome::Skipped)
    }
}

#[derive(Debug)]
struct Element {
    config: EffectConfig,
    surface: Option<EffectSurface>,
}

/// 帧循环
#[derive(Debug, Default)]
pub struct Stage {
    elements: BTreeMap<SurfaceId, Element>,
    frame_count: u64,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记元素（重复登记会替换配置并销毁旧表面）
    pub fn mount(&mut self, id: SurfaceId, config: EffectConfig) {
        if self.elements.contains_key(&id) {
            debug!(surface = %id, "重复挂载，替换旧表面");
        }
        self.elements.insert(
            id,
            Element {
                config,
                surface: None,
            },
        );
    }

    /// 卸载元素，返回是否存在
    pub fn unmount(&mut self, id: SurfaceId) -> bool {
        let removed = self.elements.remove(&id).is_some();
        if removed {
            debug!(surface = %id, "表面已销毁");
        }
        removed
    }

    /// 元素尺寸观测
    pub fn observe_size(&mut self, id: SurfaceId, width: u32, height: u32) {
        let Some(element) = self.elements.get_mut(&id) else {
            debug!(surface = %id, "未知元素的尺寸观测，忽略");
            return;
        };

        match &mut element.surface {
            Some(surface) => {
                surface.observe_size(width, height);
            }
            None if width > 0 && height > 0 => {
                let mut surface = EffectSurface::new(id, element.config.clone());
                surface.observe_size(width, height);
                surface.queue_trigger(TriggerKind::Mount);
                debug!(surface = %id, width, height, "表面已创建");
                element.surface = Some(surface);
            }
            None => {}
        }
    }

    /// 排队触发，返回是否被接受
    ///
    /// 未知元素或尚未创建表面时忽略。
    pub fn trigger(&mut self, id: SurfaceId, kind: TriggerKind) -> bool {
        match self.surface_mut(id) {
            Some(surface) => {
                surface.queue_trigger(kind);
                true
            }
            None => {
                debug!(surface = %id, kind = kind.name(), "没有可用表面，忽略触发");
                false
            }
        }
    }

    /// 推进并渲染所有表面
    pub fn frame(&mut self, now: f64) -> Vec<(SurfaceId, FrameOutcome)> {
        self.frame_count += 1;
        self.elements
            .iter_mut()
            .map(|(&id, element)| {
                let outcome = match &mut element.surface {
                    Some(surface) => {
                        let params = surface.advance(now);
                        match render(&params, surface.particles(), now) {
                            Some(buffer) => FrameOutcome::Drawn(buffer),
                            None => FrameOutcome::Skipped,
                        }
                    }
                    None => FrameOutcome::Skipped,
                };
                (id, outcome)
            })
            .collect()
    }

    /// 用时钟的当前时间执行一帧
    pub fn tick(&mut self, clock: &impl FrameClock) -> Vec<(SurfaceId, FrameOutcome)> {
        self.frame(clock.now())
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&EffectSurface> {
        self.elements.get(&id)?.surface.as_ref()
    }

    fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut EffectSurface> {
        self.elements.get_mut(&id)?.surface.as_mut()
    }

    /// 已挂载元素数
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// 已执行的帧数
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Preset;

    #[test]
    fn test_surface_created_on_first_nonzero_size() {
        let mut stage = Stage::new();
        let id = SurfaceId(1);
        stage.mount(id, Preset::EdgePulse.config());

        stage.observe_size(id, 0, 0);
        assert!(stage.surface(id).is_none());
        assert!(!stage.trigger(id, TriggerKind::Click));

        stage.observe_size(id, 120, 80);
        assert!(stage.surface(id).is_some());
        assert!(stage.trigger(id, TriggerKind::Click));
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut stage = Stage::new();
        stage.observe_size(SurfaceId(9), 10, 10);
        assert!(!stage.trigger(SurfaceId(9), TriggerKind::Click));
        assert!(!stage.unmount(SurfaceId(9)));
        assert!(stage.frame(0.0).is_empty());
    }

    #[test]
    fn test_frame_skips_zero_resolution() {
        let mut stage = Stage::new();
        let id = SurfaceId(2);
        stage.mount(id, Preset::EdgePulse.config());
        stage.observe_size(id, 50, 50);
        stage.observe_size(id, 0, 50);

        let frames = stage.frame(0.0);
        assert_eq!(frames.len(), 1);
        assert!(frames[0].1.is_skipped());
    }

    #[test]
    fn test_tick_uses_clock() {
        let mut stage = Stage::new();
        let id = SurfaceId(3);
        stage.mount(id, Preset::EdgePulse.config());
        stage.observe_size(id, 64, 32);
        stage.trigger(id, TriggerKind::Click);

        let clock = ManualClock::new(4.0);
        stage.tick(&clock);
        assert_eq!(stage.surface(id).unwrap().pulse().triggered_at(), Some(4.0));
        assert_eq!(stage.frame_count(), 1);
    }

    #[test]
    fn test_unmount_destroys_surface() {
        let mut stage = Stage::new();
        let id = SurfaceId(4);
        stage.mount(id, Preset::Explosion.config());
        stage.observe_size(id, 40, 40);
        assert!(stage.unmount(id));
        assert!(stage.surface(id).is_none());
        assert!(stage.is_empty());
    }
}
