//! # Export 模块
//!
//! 把渲染结果写成 PNG 文件。

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::renderer::PixelBuffer;

/// 导出错误
#[derive(Error, Debug)]
pub enum ExportError {
    /// 创建输出目录失败
    #[error("无法创建输出目录 {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 图像编码 / 写入失败
    #[error("写入图像失败 {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// 保存单帧为 PNG
pub fn save_png(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ExportError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    buffer
        .to_rgba_image()
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| ExportError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), "帧已导出");
    Ok(())
}

/// 帧序列文件名：`<dir>/<prefix>_<index:04>.png`
pub fn frame_path(dir: &Path, prefix: &str, index: usize) -> PathBuf {
    dir.join(format!("{prefix}_{index:04}.png"))
}
