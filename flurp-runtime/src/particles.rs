//! # Particles 模块
//!
//! 粒子爆炸模拟。
//!
//! 每个粒子的位置是"生成后经过时间"的纯函数，渲染端任意时刻都可以重新求值：
//!
//! ```text
//! p(t) = p0 + (cos a · s · t, (sin a · s · t − bias · drift · t) · vertical_scale)
//! ```
//!
//! 屏幕坐标 y 轴向下，`bias ∈ [0, 1)` 让粒子整体向上漂移。
//! 同一发射器同一时间最多只有一批存活粒子（重入保护）。

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::border::smoothstep;
use crate::color::Rgb;
use crate::error::{FxError, FxResult, ensure_non_negative, ensure_positive};
use crate::sdf::Vec2;

/// 爆炸参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    /// 每批粒子数
    #[serde(default = "default_count")]
    pub count: usize,
    /// 存活时间（秒）
    #[serde(default = "default_lifetime")]
    pub lifetime: f32,
    /// 基础速度（像素/秒）
    #[serde(default = "default_base_speed")]
    pub base_speed: f32,
    /// 速度随机增量上限（像素/秒）
    #[serde(default = "default_speed_variance")]
    pub speed_variance: f32,
    /// 发射角随机偏移上限（弧度）
    #[serde(default = "default_angle_jitter")]
    pub angle_jitter: f32,
    /// 向上漂移速度（像素/秒，乘以每粒子的 bias）
    #[serde(default = "default_drift")]
    pub drift: f32,
    /// 竖直方向拉伸
    #[serde(default = "default_vertical_scale")]
    pub vertical_scale: f32,
    /// 点尺寸（像素）
    #[serde(default = "default_point_size")]
    pub point_size: f32,
    /// 粒子颜色
    #[serde(default = "default_particle_color")]
    pub color: Rgb,
    /// 是否加法混合
    #[serde(default = "default_additive")]
    pub additive: bool,
    /// 画布边缘暗角宽度（归一化半径）
    #[serde(default = "default_vignette_width")]
    pub vignette_width: f32,
}

fn default_count() -> usize {
    1000
}

fn default_lifetime() -> f32 {
    1.0
}

fn default_base_speed() -> f32 {
    60.0
}

fn default_speed_variance() -> f32 {
    90.0
}

fn default_angle_jitter() -> f32 {
    0.5
}

fn default_drift() -> f32 {
    60.0
}

fn default_vertical_scale() -> f32 {
    1.5
}

fn default_point_size() -> f32 {
    2.0
}

fn default_particle_color() -> Rgb {
    // #660000
    Rgb::new(0.4, 0.0, 0.0)
}

fn default_additive() -> bool {
    true
}

fn default_vignette_width() -> f32 {
    0.3
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            lifetime: default_lifetime(),
            base_speed: default_base_speed(),
            speed_variance: default_speed_variance(),
            angle_jitter: default_angle_jitter(),
            drift: default_drift(),
            vertical_scale: default_vertical_scale(),
            point_size: default_point_size(),
            color: default_particle_color(),
            additive: default_additive(),
            vignette_width: default_vignette_width(),
        }
    }
}

impl ParticleConfig {
    /// 校验参数
    pub fn validate(&self) -> FxResult<()> {
        if self.count == 0 {
            return Err(FxError::invalid("particles.count", 0.0, "至少需要一个粒子"));
        }
        ensure_positive("particles.lifetime", self.lifetime)?;
        ensure_non_negative("particles.base_speed", self.base_speed)?;
        ensure_non_negative("particles.speed_variance", self.speed_variance)?;
        ensure_non_negative("particles.angle_jitter", self.angle_jitter)?;
        ensure_non_negative("particles.drift", self.drift)?;
        ensure_positive("particles.vertical_scale", self.vertical_scale)?;
        ensure_positive("particles.point_size", self.point_size)?;
        ensure_non_negative("particles.vignette_width", self.vignette_width)
    }
}

/// 生成区域：以 `center` 为中心、尺寸为 `size` 的矩形
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnArea {
    pub center: Vec2,
    pub size: Vec2,
}

impl SpawnArea {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// 以原点为中心
    pub fn centered(width: f32, height: f32) -> Self {
        Self::new(Vec2::zero(), Vec2::new(width, height))
    }
}

/// 单个粒子的生成参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub origin: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub bias: f32,
}

impl Particle {
    /// 生成后 `t` 秒的位置
    pub fn position_at(&self, t: f32, drift: f32, vertical_scale: f32) -> Vec2 {
        let travel = self.speed * t;
        Vec2::new(
            self.origin.x + self.angle.cos() * travel,
            self.origin.y + (self.angle.sin() * travel - self.bias * drift * t) * vertical_scale,
        )
    }
}

/// 一批粒子
///
/// 粒子数量和生成参数在生成时固定。
#[derive(Debug, Clone)]
pub struct ParticleBatch {
    particles: Vec<Particle>,
    spawned_at: f64,
    lifetime: f32,
    drift: f32,
    vertical_scale: f32,
}

impl ParticleBatch {
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn spawned_at(&self) -> f64 {
        self.spawned_at
    }

    /// 生成后经过的秒数（时钟回退时按 0 处理）
    pub fn elapsed(&self, now: f64) -> f32 {
        (now - self.spawned_at).max(0.0) as f32
    }

    /// 是否已过期
    pub fn is_expired(&self, now: f64) -> bool {
        self.elapsed(now) >= self.lifetime
    }

    /// `now` 时刻所有粒子的位置
    pub fn positions_at(&self, now: f64) -> impl Iterator<Item = Vec2> + '_ {
        let t = self.elapsed(now);
        self.particles
            .iter()
            .map(move |p| p.position_at(t, self.drift, self.vertical_scale))
    }
}

/// 爆炸发射器
///
/// 持有随机源和至多一批存活粒子。
#[derive(Debug, Clone)]
pub struct ExplosionEmitter {
    config: ParticleConfig,
    rng: StdRng,
    batch: Option<ParticleBatch>,
}

impl ExplosionEmitter {
    /// 创建发射器；`seed` 为 None 时使用系统熵
    pub fn new(config: ParticleConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng,
            batch: None,
        }
    }

    /// 触发爆炸
    ///
    /// 上一批仍存活时忽略，返回是否真正生成了新批次。
    pub fn trigger(&mut self, now: f64, area: SpawnArea) -> bool {
        self.advance(now);
        if self.batch.is_some() {
            debug!("爆炸仍在进行，忽略重复触发");
            return false;
        }

        let config = &self.config;
        let count = config.count;
        if count == 0 {
            debug!("粒子数为 0，不生成批次");
            return false;
        }
        let mut particles = Vec::with_capacity(count);
        for i in 0..count {
            let jitter = Vec2::new(
                (self.rng.gen_range(0.0f32..1.0) - 0.5) * area.size.x,
                (self.rng.gen_range(0.0f32..1.0) - 0.5) * area.size.y,
            );
            let angle = i as f32 / count as f32 * TAU
                + self.rng.gen_range(0.0f32..1.0) * config.angle_jitter;
            let speed = config.base_speed + self.rng.gen_range(0.0f32..1.0) * config.speed_variance;
            let bias = self.rng.gen_range(0.0f32..1.0);
            particles.push(Particle {
                origin: area.center + jitter,
                angle,
                speed,
                bias,
            });
        }

        debug!(count, "生成粒子批次");
        self.batch = Some(ParticleBatch {
            particles,
            spawned_at: now,
            lifetime: config.lifetime,
            drift: config.drift,
            vertical_scale: config.vertical_scale,
        });
        true
    }

    /// 推进到 `now`，过期批次被清除
    pub fn advance(&mut self, now: f64) {
        if self.batch.as_ref().is_some_and(|b| b.is_expired(now)) {
            debug!("粒子批次过期");
            self.batch = None;
        }
    }

    /// 当前存活批次
    pub fn batch(&self) -> Option<&ParticleBatch> {
        self.batch.as_ref()
    }

    /// 是否有存活批次
    pub fn is_active(&self) -> bool {
        self.batch.is_some()
    }

    /// 存活粒子数
    pub fn active_count(&self) -> usize {
        self.batch.as_ref().map_or(0, ParticleBatch::len)
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }
}

/// 画布边缘暗角：`1 − smoothstep(1 − width, 1, r)`
///
/// `r` 是以画布中心为原点、按半尺寸归一化后的半径。
pub fn vignette(r: f32, width: f32) -> f32 {
    1.0 - smoothstep(1.0 - width, 1.0, r)
}
