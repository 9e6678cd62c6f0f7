//! # Flurp Host
//!
//! 效果引擎的宿主层：把 `flurp-runtime` 的纯数值状态变成像素。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 效果表面的生命周期与分辨率同步
//! - 单线程帧循环（触发排队、状态推进）
//! - CPU 软件渲染与合成
//! - 配置加载、日志、PNG 导出
//!
//! 真实窗口 / 图形上下文不在本 crate 中，headless CLI 用手动时钟驱动帧循环。

pub mod clock;
pub mod config;
pub mod export;
pub mod logging;
pub mod renderer;
pub mod stage;
pub mod surface;

pub use clock::{FrameClock, ManualClock, SystemClock};
pub use config::{BorderStyle, ConfigError, EffectConfig, Preset, SwirlConfig};
pub use export::{ExportError, frame_path, save_png};
pub use renderer::{BlendMode, PixelBuffer, render};
pub use stage::{FrameOutcome, Stage};
pub use surface::{
    BorderShading, EffectSurface, ParticleShading, Resolution, ShadingParams, SurfaceId,
    SwirlShading,
};
