//! # Color 模块
//!
//! 颜色值类型。通道均为 0.0 - 1.0 的浮点数，与着色参数保持一致。

use serde::{Deserialize, Serialize};

use crate::error::{FxError, FxResult};

/// RGB 颜色（每通道 0.0 - 1.0）
///
/// 序列化为 `#RRGGBB` 字符串，反序列化接受 [`Rgb::parse`] 支持的所有写法。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    /// 默认边框色 #05C7CC
    pub const CYAN: Rgb = Rgb::new(0.019_607_843, 0.780_392_16, 0.8);
    /// 双色边框的第二色 #CC05C7
    pub const MAGENTA: Rgb = Rgb::new(0.8, 0.019_607_843, 0.780_392_16);
    pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    /// 按钮边框的暗红第二色
    pub const DARK_RED: Rgb = Rgb::new(0.5, 0.1, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    /// 创建颜色
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// 解析颜色字符串
    ///
    /// 支持 `#RRGGBB`、`#RGB` 以及少量 CSS 颜色名（`red`、`blue` 等）。
    pub fn parse(input: &str) -> FxResult<Self> {
        let trimmed = input.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return Self::from_hex_digits(input, hex);
        }

        let named = match trimmed.to_lowercase().as_str() {
            "red" => Rgb::RED,
            "green" => Rgb::new(0.0, 0.5, 0.0),
            "lime" => Rgb::new(0.0, 1.0, 0.0),
            "blue" => Rgb::new(0.0, 0.0, 1.0),
            "yellow" => Rgb::new(1.0, 1.0, 0.0),
            "purple" => Rgb::new(0.5, 0.0, 0.5),
            "white" => Rgb::WHITE,
            "black" => Rgb::BLACK,
            "cyan" => Rgb::CYAN,
            "magenta" => Rgb::MAGENTA,
            _ => {
                return Err(FxError::InvalidColor {
                    input: input.to_string(),
                    message: "未知颜色名".to_string(),
                });
            }
        };
        Ok(named)
    }

    fn from_hex_digits(input: &str, hex: &str) -> FxResult<Self> {
        let invalid = |message: &str| FxError::InvalidColor {
            input: input.to_string(),
            message: message.to_string(),
        };

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid("包含非十六进制字符"));
        }

        let channel = |s: &str| -> FxResult<f32> {
            u8::from_str_radix(s, 16)
                .map(|v| f32::from(v) / 255.0)
                .map_err(|e| invalid(&e.to_string()))
        };

        match hex.len() {
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let expand = |i: usize| hex[i..i + 1].repeat(2);
                Ok(Self::new(
                    channel(&expand(0))?,
                    channel(&expand(1))?,
                    channel(&expand(2))?,
                ))
            }
            _ => Err(invalid("长度必须是 3 或 6 位")),
        }
    }

    /// `#RRGGBB` 形式（通道先截断到 0.0 - 1.0）
    pub fn to_hex(self) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    /// 所有通道乘以同一系数
    pub fn scale(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k)
    }

    /// 线性混合 `mix(self, other, t)`
    pub fn mix(self, other: Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// 附加 alpha
    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }
}

impl TryFrom<String> for Rgb {
    type Error = FxError;

    fn try_from(value: String) -> FxResult<Self> {
        Self::parse(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::CYAN
    }
}

/// RGBA 颜色（直通 alpha，与片段着色器的输出语义相同）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// 透明黑
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    /// 创建颜色
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// 取 RGB 部分
    pub fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// 是否完全透明
    pub fn is_transparent(self) -> bool {
        self.a <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        (a.r - b.r).abs() < 1e-3 && (a.g - b.g).abs() < 1e-3 && (a.b - b.b).abs() < 1e-3
    }

    #[test]
    fn test_parse_hex() {
        assert!(close(Rgb::parse("#05C7CC").unwrap(), Rgb::CYAN));
        assert!(close(
            Rgb::parse("#660000").unwrap(),
            Rgb::new(0.4, 0.0, 0.0)
        ));
        assert!(close(Rgb::parse("#fff").unwrap(), Rgb::WHITE));
    }

    #[test]
    fn test_hex_output() {
        assert_eq!(Rgb::CYAN.to_hex(), "#05C7CC");
        assert_eq!(Rgb::MAGENTA.to_string(), "#CC05C7");
        assert_eq!(Rgb::new(2.0, -1.0, 0.5).to_hex(), "#FF0080");
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Rgb::RED).unwrap();
        assert_eq!(json, r##""#FF0000""##);
        let back: Rgb = serde_json::from_str(r#""red""#).unwrap();
        assert_eq!(back, Rgb::RED);
        assert!(serde_json::from_str::<Rgb>(r##""#XYZ""##).is_err());
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(Rgb::parse("Red").unwrap(), Rgb::RED);
        assert_eq!(Rgb::parse(" blue ").unwrap(), Rgb::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            Rgb::parse("#12345"),
            Err(FxError::InvalidColor { .. })
        ));
        assert!(Rgb::parse("#GG0000").is_err());
        assert!(Rgb::parse("chartreuse-ish").is_err());
        // 多字节字符不能导致切片 panic
        assert!(Rgb::parse("#红红").is_err());
    }

    #[test]
    fn test_mix_endpoints() {
        let a = Rgb::RED;
        let b = Rgb::WHITE;
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 1.0), b);
        assert_eq!(a.mix(b, 0.5), Rgb::new(1.0, 0.5, 0.5));
    }
}
