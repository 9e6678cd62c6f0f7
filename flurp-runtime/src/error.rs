//! # Error 模块
//!
//! 定义 flurp-runtime 中使用的错误类型。
//!
//! 注意：逐帧计算永远不会返回错误（几何无效时跳过绘制，重入触发直接忽略），
//! 这里的错误只出现在**构造期**：颜色解析、参数校验。

use thiserror::Error;

/// 效果参数错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FxError {
    /// 无效的颜色字符串
    #[error("无效的颜色 '{input}'：{message}")]
    InvalidColor { input: String, message: String },

    /// 参数值超出允许范围
    #[error("参数 '{param}' 的值无效：{value}（{message}）")]
    InvalidParameter {
        param: &'static str,
        value: f64,
        message: &'static str,
    },
}

impl FxError {
    /// 构造参数错误的便捷方法
    pub fn invalid(param: &'static str, value: impl Into<f64>, message: &'static str) -> Self {
        Self::InvalidParameter {
            param,
            value: value.into(),
            message,
        }
    }
}

/// Result 类型别名
pub type FxResult<T> = Result<T, FxError>;

/// 校验参数为有限且非负
pub fn ensure_non_negative(param: &'static str, value: f32) -> FxResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(FxError::invalid(param, value, "必须是非负有限数"));
    }
    Ok(())
}

/// 校验参数为有限且严格为正
pub fn ensure_positive(param: &'static str, value: f32) -> FxResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(FxError::invalid(param, value, "必须是正的有限数"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_helpers() {
        assert!(ensure_non_negative("hold", 0.0).is_ok());
        assert!(ensure_non_negative("hold", -0.1).is_err());
        assert!(ensure_positive("lifetime", 0.0).is_err());
        assert!(ensure_positive("lifetime", f32::NAN).is_err());
        assert!(ensure_positive("lifetime", 1.0).is_ok());
    }

    #[test]
    fn test_error_message_mentions_param() {
        let err = FxError::invalid("decay_rate", -1.0f32, "必须是正的有限数");
        assert!(err.to_string().contains("decay_rate"));
    }
}
