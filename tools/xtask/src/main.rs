//! # xtask
//!
//! flurp 工作区的本地门禁与基准命令，用 `cargo xtask <command>` 调用。

use std::process::{Command, ExitCode};
use std::time::{Duration, Instant};

use flurp_host::{FrameClock, ManualClock, Preset, Stage, SurfaceId};
use flurp_runtime::TriggerKind;

/// 提交前的门禁步骤，按顺序执行
const GATE: &[&[&str]] = &[
    &["fmt", "--all", "--", "--check"],
    &["clippy", "--workspace", "--all-targets"],
    &["test", "--workspace"],
];

const COV_REPORT: &str = "target/llvm-cov/html/index.html";

/// 运行一条 cargo 命令，非零退出视为失败
fn cargo(args: &[&str]) -> anyhow::Result<()> {
    let step = format!("cargo {}", args.join(" "));
    eprintln!("\n==> {step}");
    let status = Command::new("cargo").args(args).status()?;
    anyhow::ensure!(status.success(), "{step} 失败（{status}）");
    Ok(())
}

/// 覆盖率报告依赖 cargo-llvm-cov
fn coverage(scope: &[&str]) -> anyhow::Result<()> {
    let available = Command::new("cargo")
        .args(["llvm-cov", "--version"])
        .output()
        .is_ok_and(|out| out.status.success());
    anyhow::ensure!(
        available,
        "缺少 cargo-llvm-cov，先执行 `cargo install cargo-llvm-cov` 和 \
         `rustup component add llvm-tools-preview`"
    );

    let mut args = vec!["llvm-cov"];
    args.extend_from_slice(scope);
    args.extend(["--all-features", "--html"]);
    cargo(&args)?;
    eprintln!("\n覆盖率报告: {COV_REPORT}");
    Ok(())
}

fn main() -> ExitCode {
    match dispatch() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("xtask: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_default();

    match sub.as_str() {
        "check-all" => GATE.iter().try_for_each(|step| cargo(step)),
        "cov-runtime" => coverage(&["-p", "flurp-runtime"]),
        // 工具 crate 不计入工作区覆盖率
        "cov-workspace" => coverage(&["--workspace", "--exclude", "xtask"]),
        "frame-bench" => {
            let size = args.next();
            let frames = args.next();
            frame_bench(size.as_deref(), frames.as_deref())
        }
        "" | "help" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        other => anyhow::bail!("未知子命令: {other}（见 `cargo xtask help`）"),
    }
}

fn print_help() {
    eprintln!(
        "\
cargo xtask <command>

  check-all                  fmt --check、clippy、test 依次执行
  cov-runtime                flurp-runtime 覆盖率（HTML）
  cov-workspace              除 xtask 外的工作区覆盖率（HTML）
  frame-bench [WxH] [N]      每个预设渲染 N 帧（默认 320x240、60 帧），
                             第 0 帧单击一次，输出平均与最慢帧耗时

别名见 .cargo/config.toml：cargo check-all / cov-runtime / cov-workspace / frame-bench"
    );
}

//=============================================================================
// frame-bench 命令实现
//=============================================================================

const DEFAULT_SIZE: (u32, u32) = (320, 240);
const DEFAULT_FRAMES: usize = 60;
const FRAME_DT: f64 = 1.0 / 60.0;

/// 单个预设的测量结果
struct BenchResult {
    preset: Preset,
    frames: usize,
    total: Duration,
    slowest: Duration,
    lit_pixels: usize,
}

impl BenchResult {
    fn mean(&self) -> Duration {
        self.total / self.frames.max(1) as u32
    }
}

/// 解析 `WxH`
fn parse_size(input: &str) -> anyhow::Result<(u32, u32)> {
    let Some((w, h)) = input.split_once(['x', 'X']) else {
        anyhow::bail!("尺寸格式应为 WxH: {input}");
    };
    let size: (u32, u32) = (w.trim().parse()?, h.trim().parse()?);
    if size.0 == 0 || size.1 == 0 {
        anyhow::bail!("尺寸不能为 0: {input}");
    }
    Ok(size)
}

fn frame_bench(size: Option<&str>, frames: Option<&str>) -> anyhow::Result<()> {
    let (width, height) = match size {
        Some(s) => parse_size(s)?,
        None => DEFAULT_SIZE,
    };
    let frames = match frames {
        Some(f) => f.parse()?,
        None => DEFAULT_FRAMES,
    };

    eprintln!("==> frame-bench {width}x{height}, {frames} 帧/预设\n");

    let results: Vec<BenchResult> = Preset::ALL
        .iter()
        .map(|&preset| bench_preset(preset, width, height, frames))
        .collect();

    print_bench_result(&results);
    Ok(())
}

/// 对单个预设跑完整帧循环
fn bench_preset(preset: Preset, width: u32, height: u32, frames: usize) -> BenchResult {
    let id = SurfaceId(0);
    let mut config = preset.config();
    config.seed = Some(0);

    let mut stage = Stage::new();
    stage.mount(id, config);
    stage.observe_size(id, width, height);
    stage.trigger(id, TriggerKind::Click);

    let clock = ManualClock::new(0.0);
    let mut result = BenchResult {
        preset,
        frames,
        total: Duration::ZERO,
        slowest: Duration::ZERO,
        lit_pixels: 0,
    };

    for index in 0..frames {
        clock.set(index as f64 * FRAME_DT);
        let start = Instant::now();
        let outcomes = stage.frame(clock.now());
        let elapsed = start.elapsed();

        result.total += elapsed;
        result.slowest = result.slowest.max(elapsed);
        result.lit_pixels += outcomes
            .iter()
            .filter_map(|(_, outcome)| outcome.buffer())
            .map(|buffer| buffer.lit_pixel_count())
            .sum::<usize>();
    }

    result
}

/// 输出测量结果
fn print_bench_result(results: &[BenchResult]) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!(
        "{:<12} {:>10} {:>10} {:>12}",
        "preset", "mean", "slowest", "lit/frame"
    );
    for r in results {
        eprintln!(
            "{:<12} {:>10.2?} {:>10.2?} {:>12}",
            r.preset.name(),
            r.mean(),
            r.slowest,
            r.lit_pixels / r.frames.max(1),
        );
    }
}
