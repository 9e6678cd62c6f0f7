//! # Config 模块
//!
//! 效果配置管理，所有参数在构造期确定。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (JSON)
//! 3. 预设 / 默认值（最低）

use std::f32::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use flurp_runtime::{
    FadeConfig, FxError, InteractionTable, ParticleConfig, PulseConfig, Rgb, ToneMix,
    TriggerBindings, WaveForm, WaveParams,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// 边框样式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum BorderStyle {
    /// 整个表面的矩形边缘发光，宽度随脉冲变化
    EdgeGlow {
        #[serde(default)]
        wave: WaveParams,
    },
    /// 两道独立波纹的双色边框，宽度随脉冲变化
    DualTone {
        primary: WaveParams,
        secondary: WaveParams,
        secondary_color: Rgb,
        #[serde(default = "default_dual_tone_mix")]
        mix: ToneMix,
    },
    /// 内缩圆角矩形边框，波纹随交互状态变化
    Button {
        #[serde(default = "default_button_inset")]
        inset: f32,
        #[serde(default = "default_button_corner_radius")]
        corner_radius: f32,
        primary: WaveParams,
        secondary: WaveParams,
        secondary_color: Rgb,
        #[serde(default)]
        mix: ToneMix,
        #[serde(default = "InteractionTable::button")]
        interaction: InteractionTable,
    },
}

/// 旋涡发光层参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwirlConfig {
    /// 坐标扭曲迭代次数
    #[serde(default = "default_swirl_iterations")]
    pub iterations: u32,
    /// 每次迭代的扭曲强度（第 i 次为 `warp / i`）
    #[serde(default = "default_swirl_warp")]
    pub warp: f32,
    /// 亮度系数
    #[serde(default = "default_swirl_intensity")]
    pub intensity: f32,
}

/// 效果配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectConfig {
    /// 基础颜色
    #[serde(default)]
    pub color: Rgb,

    /// 边框层（None 时不绘制边框）
    #[serde(default = "default_border")]
    pub border: Option<BorderStyle>,

    /// 旋涡层（不透明度由淡入淡出驱动）
    #[serde(default)]
    pub swirl: Option<SwirlConfig>,

    /// 是否启用粒子爆炸层
    #[serde(default)]
    pub explosion: bool,

    /// 表面相对元素四周的留白（像素）
    #[serde(default)]
    pub padding: f32,

    /// 脉冲参数
    #[serde(default)]
    pub pulse: PulseConfig,

    /// 淡入淡出参数
    #[serde(default)]
    pub fade: FadeConfig,

    /// 粒子参数
    #[serde(default)]
    pub particles: ParticleConfig,

    /// 事件绑定
    #[serde(default)]
    pub bindings: TriggerBindings,

    /// 粒子随机种子（None 时使用系统熵）
    #[serde(default)]
    pub seed: Option<u64>,
}

// 默认值函数
fn default_border() -> Option<BorderStyle> {
    Some(BorderStyle::EdgeGlow {
        wave: WaveParams::default(),
    })
}

fn default_dual_tone_mix() -> ToneMix {
    ToneMix::Weighted
}

fn default_button_inset() -> f32 {
    10.0
}

fn default_button_corner_radius() -> f32 {
    10.0
}

fn default_swirl_iterations() -> u32 {
    9
}

fn default_swirl_warp() -> f32 {
    0.6
}

fn default_swirl_intensity() -> f32 {
    0.1
}

impl Default for SwirlConfig {
    fn default() -> Self {
        Self {
            iterations: default_swirl_iterations(),
            warp: default_swirl_warp(),
            intensity: default_swirl_intensity(),
        }
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            color: Rgb::default(),
            border: default_border(),
            swirl: None,
            explosion: false,
            padding: 0.0,
            pulse: PulseConfig::default(),
            fade: FadeConfig::default(),
            particles: ParticleConfig::default(),
            bindings: TriggerBindings::default(),
            seed: None,
        }
    }
}

/// 内置预设
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// 单色脉冲边缘
    EdgePulse,
    /// 青 / 品红双色边框
    DualTone,
    /// 圆角按钮边框
    Button,
    /// 粒子爆炸
    Explosion,
    /// 旋涡淡入淡出
    SwirlFade,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::EdgePulse,
        Preset::DualTone,
        Preset::Button,
        Preset::Explosion,
        Preset::SwirlFade,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::EdgePulse => "edge-pulse",
            Preset::DualTone => "dual-tone",
            Preset::Button => "button",
            Preset::Explosion => "explosion",
            Preset::SwirlFade => "swirl-fade",
        }
    }

    /// 预设对应的完整配置
    pub fn config(self) -> EffectConfig {
        match self {
            Preset::EdgePulse => EffectConfig::default(),
            Preset::DualTone => EffectConfig {
                border: Some(BorderStyle::DualTone {
                    primary: WaveParams {
                        form: WaveForm::Lifted,
                        amplitude: 0.8,
                        frequency: 6.0,
                        speed: 8.0,
                        phase: 0.0,
                    },
                    // 第二道波纹时间偏移 0.5s：(t + 0.5)·1.0
                    secondary: WaveParams {
                        form: WaveForm::Lifted,
                        amplitude: 2.0,
                        frequency: 4.0,
                        speed: 1.0,
                        phase: 0.5,
                    },
                    secondary_color: Rgb::MAGENTA,
                    mix: ToneMix::Weighted,
                }),
                ..EffectConfig::default()
            },
            Preset::Button => EffectConfig {
                color: Rgb::RED,
                border: Some(BorderStyle::Button {
                    inset: default_button_inset(),
                    corner_radius: default_button_corner_radius(),
                    primary: WaveParams {
                        form: WaveForm::Floored { floor: 0.2 },
                        amplitude: 1.0,
                        frequency: 6.0,
                        speed: 4.0,
                        phase: 0.0,
                    },
                    secondary: WaveParams {
                        form: WaveForm::Floored { floor: 0.2 },
                        amplitude: 0.7,
                        frequency: 3.0,
                        speed: 2.0,
                        phase: PI,
                    },
                    secondary_color: Rgb::DARK_RED,
                    mix: ToneMix::Average,
                    interaction: InteractionTable::button(),
                }),
                ..EffectConfig::default()
            },
            Preset::Explosion => EffectConfig {
                border: None,
                explosion: true,
                padding: 20.0,
                ..EffectConfig::default()
            },
            Preset::SwirlFade => EffectConfig {
                color: Rgb::WHITE,
                border: None,
                swirl: Some(SwirlConfig::default()),
                ..EffectConfig::default()
            },
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|p| p.name() == normalized)
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl EffectConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并打印警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match Self::from_json(&content) {
                Ok(config) => {
                    info!(path = %path.display(), "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 读取并解析配置文件，失败时返回错误而不回退到默认值
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// 从 JSON 文本解析
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 格式化为 JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pulse.validate()?;
        self.fade.validate()?;
        self.particles.validate()?;

        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(ConfigError::ValidationFailed(format!(
                "padding 必须是非负有限数: {}",
                self.padding
            )));
        }

        if let Some(BorderStyle::Button {
            inset,
            corner_radius,
            ..
        }) = &self.border
        {
            if !inset.is_finite() || *inset <= 0.0 {
                return Err(ConfigError::ValidationFailed(format!(
                    "按钮 inset 必须为正: {inset}"
                )));
            }
            if !corner_radius.is_finite() || *corner_radius < 0.0 {
                return Err(ConfigError::ValidationFailed(format!(
                    "按钮圆角半径不能为负: {corner_radius}"
                )));
            }
        }

        if let Some(swirl) = &self.swirl
            && swirl.iterations == 0
        {
            return Err(ConfigError::ValidationFailed(
                "旋涡迭代次数至少为 1".to_string(),
            ));
        }

        if self.border.is_none() && self.swirl.is_none() && !self.explosion {
            warn!("配置未启用任何图层，输出将始终透明");
        }

        Ok(())
    }
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 序列化 / 反序列化失败
    #[error("配置序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO 错误
    #[error("配置 IO 错误: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 参数超出范围
    #[error("配置参数无效: {0}")]
    InvalidParameter(#[from] FxError),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),

    /// 未知预设名
    #[error("未知预设: {0}（可选：edge-pulse, dual-tone, button, explosion, swirl-fade）")]
    UnknownPreset(String),
}
