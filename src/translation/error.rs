//! 翻译服务统一错误处理
//!
//! 外部翻译服务的所有失败都归一为 [`ProviderError`]，调用方只需要关心
//! "这次尝试失败了"，具体原因用于日志。

use thiserror::Error;

/// 翻译提供方错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// 网络错误（连接失败、DNS、TLS 等）
    #[error("network error: {0}")]
    Network(String),

    /// 非 2xx 的 HTTP 响应
    #[error("provider responded with HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    /// 提供方在响应体中报告的错误
    #[error("provider error {status}: {details}")]
    Api { status: i64, details: String },

    /// 响应体无法解析或缺少译文
    #[error("malformed provider response: {0}")]
    Malformed(String),

    /// 超时
    #[error("translation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl ProviderError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout(_))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return ProviderError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            };
        }

        if error.is_decode() {
            ProviderError::Malformed(error.to_string())
        } else {
            ProviderError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(error: serde_json::Error) -> Self {
        ProviderError::Malformed(format!("JSON解析错误: {}", error))
    }
}

/// 错误结果类型别名
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timeout_classification() {
        assert!(ProviderError::Timeout(Duration::from_secs(10)).is_timeout());
        assert!(!ProviderError::Network("reset".into()).is_timeout());
    }

    #[test]
    fn test_json_error_is_malformed() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(ProviderError::from(err), ProviderError::Malformed(_)));
    }
}
