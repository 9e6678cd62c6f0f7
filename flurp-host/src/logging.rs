//! # Logging 模块
//!
//! 安装 `tracing-subscriber` 的 fmt 订阅器。

use tracing::Level;

/// 按 `-v` 次数选择日志级别：0 = WARN，1 = INFO，2 = DEBUG，3+ = TRACE
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// 初始化全局订阅器
///
/// 重复调用时保留已安装的订阅器。
pub fn init(verbosity: u8) {
    let result = tracing_subscriber::fmt()
        .with_max_level(level_for(verbosity))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    if result.is_err() {
        tracing::debug!("日志订阅器已存在，跳过初始化");
    }
}
