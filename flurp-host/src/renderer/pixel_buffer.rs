//! # PixelBuffer 模块
//!
//! CPU 侧的浮点 RGBA 画布（直通 alpha），渲染器的合成目标。

use flurp_runtime::Rgba;
use image::{Rgba as ImageRgba, RgbaImage};

/// 合成方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// 标准 source-over
    Over,
    /// 加法：预乘颜色相加，结果仍以直通 alpha 存储
    Additive,
}

/// 浮点 RGBA 画布
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pixels: Vec<Rgba>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// 创建全透明画布
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![Rgba::TRANSPARENT; width as usize * height as usize],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// 读取像素，越界返回 None
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// 按模式把 `src` 合成到 (x, y)，越界静默忽略
    pub fn blend(&mut self, x: i64, y: i64, src: Rgba, mode: BlendMode) {
        if src.is_transparent() || x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u64, y as u64);
        if x >= u64::from(self.width) || y >= u64::from(self.height) {
            return;
        }
        let index = self.index(x as u32, y as u32);
        if let Some(dst) = self.pixels.get_mut(index) {
            *dst = match mode {
                BlendMode::Over => over(src, *dst),
                BlendMode::Additive => additive(src, *dst),
            };
        }
    }

    /// 是否所有像素都完全透明
    pub fn is_clear(&self) -> bool {
        self.pixels.iter().all(|p| p.is_transparent())
    }

    /// 非透明像素数
    pub fn lit_pixel_count(&self) -> usize {
        self.pixels.iter().filter(|p| !p.is_transparent()).count()
    }

    /// 转换为 8 位图像（通道截断到 0.0 - 1.0）
    pub fn to_rgba_image(&self) -> RgbaImage {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let p = self.pixels[self.index(x, y)];
            ImageRgba([quantize(p.r), quantize(p.g), quantize(p.b), quantize(p.a)])
        })
    }
}

/// source-over（直通 alpha）
///
/// 在预乘空间合成后再除回 alpha，结果 alpha 为 0 时得到透明黑。
fn over(src: Rgba, dst: Rgba) -> Rgba {
    let a = src.a.clamp(0.0, 1.0);
    let keep = dst.a.clamp(0.0, 1.0) * (1.0 - a);
    unpremultiply(
        src.r * a + dst.r * keep,
        src.g * a + dst.g * keep,
        src.b * a + dst.b * keep,
        a + keep,
    )
}

/// 加法合成：预乘颜色相加，alpha 取两者之和的上限 1
fn additive(src: Rgba, dst: Rgba) -> Rgba {
    let a = src.a.clamp(0.0, 1.0);
    let da = dst.a.clamp(0.0, 1.0);
    unpremultiply(
        dst.r * da + src.r * a,
        dst.g * da + src.g * a,
        dst.b * da + src.b * a,
        (da + a).min(1.0),
    )
}

fn unpremultiply(r: f32, g: f32, b: f32, a: f32) -> Rgba {
    if a <= 0.0 {
        return Rgba::TRANSPARENT;
    }
    Rgba::new(r / a, g / a, b / a, a)
}
