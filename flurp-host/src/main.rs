//! # flurp
//!
//! 效果引擎的 headless 前端：用手动时钟驱动帧循环，输出 PNG 帧序列或动画数值。
//!
//! ## 用法
//!
//! ```bash
//! flurp render --preset edge-pulse --frames 90 --out frames
//! flurp render --config effect.json --trigger click@0.2 --trigger click@0.4
//! flurp trace --preset swirl-fade --trigger mount@0 --fps 10 --frames 20
//! flurp config --preset button > button.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use flurp_host::{
    EffectConfig, FrameClock, FrameOutcome, ManualClock, Preset, Stage, SurfaceId, frame_path, logging,
    save_png,
};
use flurp_runtime::{Rgb, TriggerKind};
use tracing::info;

#[derive(Parser)]
#[command(name = "flurp")]
#[command(about = "边框发光 / 粒子爆炸效果的 headless 渲染器")]
#[command(version)]
struct Cli {
    /// 日志详细程度（-v INFO，-vv DEBUG，-vvv TRACE）
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 渲染帧序列为 PNG
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// 输出目录
        #[arg(short, long, default_value = "frames")]
        out: PathBuf,
    },

    /// 逐帧打印动画数值（不渲染像素）
    Trace {
        #[command(flatten)]
        scene: SceneArgs,
    },

    /// 打印或保存配置 JSON
    Config {
        /// 预设名
        #[arg(short, long, default_value = "edge-pulse")]
        preset: Preset,

        /// 保存到文件（默认打印到 stdout）
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SceneArgs {
    /// 预设名（edge-pulse, dual-tone, button, explosion, swirl-fade）
    #[arg(short, long, default_value = "edge-pulse")]
    preset: Preset,

    /// 配置文件（覆盖预设）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 元素宽度（像素）
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// 元素高度（像素）
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// 帧数
    #[arg(long, default_value_t = 60)]
    frames: usize,

    /// 帧率
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// 触发计划，格式 `kind@秒`，可重复
    #[arg(short, long = "trigger", value_parser = parse_trigger, default_value = "click@0")]
    triggers: Vec<(TriggerKind, f64)>,

    /// 覆盖基础颜色（#RRGGBB 或颜色名）
    #[arg(long, value_parser = parse_color)]
    color: Option<Rgb>,

    /// 覆盖留白
    #[arg(long)]
    padding: Option<f32>,

    /// 覆盖随机种子
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_trigger(input: &str) -> Result<(TriggerKind, f64), String> {
    let (name, time) = input.split_once('@').unwrap_or((input, "0"));
    let kind = TriggerKind::from_name(name).ok_or_else(|| format!("未知触发类型: {name}"))?;
    let time: f64 = time
        .trim()
        .parse()
        .map_err(|e| format!("无效的触发时间 '{time}': {e}"))?;
    if !time.is_finite() || time < 0.0 {
        return Err(format!("触发时间必须是非负数: {time}"));
    }
    Ok((kind, time))
}

fn parse_color(input: &str) -> Result<Rgb, String> {
    Rgb::parse(input).map_err(|e| e.to_string())
}

impl SceneArgs {
    /// 按优先级合成配置：命令行 > 配置文件 > 预设
    fn effect_config(&self) -> anyhow::Result<EffectConfig> {
        let mut config = match &self.config {
            Some(path) => EffectConfig::read(path)
                .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
            None => self.preset.config(),
        };
        if let Some(color) = self.color {
            config.color = color;
        }
        if let Some(padding) = self.padding {
            config.padding = padding;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate().context("配置无效")?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            bail!("fps 必须为正: {}", self.fps);
        }
        Ok(())
    }
}

/// 按计划驱动帧循环，每帧回调一次
fn run_scene(
    scene: &SceneArgs,
    mut on_frame: impl FnMut(usize, f64, &Stage, &FrameOutcome) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    scene.validate()?;
    let config = scene.effect_config()?;

    let id = SurfaceId(0);
    let mut stage = Stage::new();
    stage.mount(id, config);
    stage.observe_size(id, scene.width, scene.height);

    let mut schedule = scene.triggers.clone();
    schedule.sort_by(|a, b| a.1.total_cmp(&b.1));
    let mut schedule = schedule.into_iter().peekable();

    let clock = ManualClock::new(0.0);
    for index in 0..scene.frames {
        clock.set(index as f64 / scene.fps);
        let now = clock.now();

        while let Some((kind, _)) = schedule.next_if(|(_, at)| *at <= now) {
            stage.trigger(id, kind);
        }

        for (_, outcome) in stage.tick(&clock) {
            on_frame(index, now, &stage, &outcome)?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Render { scene, out } => {
            let mut written = 0usize;
            run_scene(&scene, |index, _, _, outcome| {
                if let FrameOutcome::Drawn(buffer) = outcome {
                    save_png(buffer, frame_path(&out, "frame", index))?;
                    written += 1;
                }
                Ok(())
            })?;
            info!(frames = written, out = %out.display(), "渲染完成");
            println!("已写入 {written} 帧到 {}", out.display());
        }
        Commands::Trace { scene } => {
            println!("frame\ttime\tpulse\tfade\tphase\tparticles\tinteraction");
            run_scene(&scene, |index, now, stage, _| {
                if let Some(surface) = stage.surface(SurfaceId(0)) {
                    println!(
                        "{index}\t{now:.3}\t{:.3}\t{:.3}\t{:?}\t{}\t{:?}",
                        surface.pulse().value(),
                        surface.fade().opacity(),
                        surface.fade().phase(),
                        surface.particles().map_or(0, |batch| batch.len()),
                        surface.interaction(),
                    );
                }
                Ok(())
            })?;
        }
        Commands::Config { preset, out } => {
            let config = preset.config();
            match out {
                Some(path) => {
                    config.save(&path)?;
                    println!("已保存 {preset} 配置到 {}", path.display());
                }
                None => println!("{}", config.to_json()?),
            }
        }
    }

    Ok(())
}
