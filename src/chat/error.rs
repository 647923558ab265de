//! 聊天服务错误

use thiserror::Error;

use crate::chat::message::ValidationErrors;
use crate::storage::StoreError;
use crate::translation::ProviderError;

/// 消息服务与翻译流水线的统一错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// 请求不合法，不会触达存储
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("message {0} not found")]
    NotFound(i64),

    /// 翻译失败；只有重试会把它返回给调用方
    #[error("translation failed: {0}")]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ChatError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => ChatError::NotFound(id),
            other => ChatError::Store(other),
        }
    }
}

pub type ChatResult<T> = Result<T, ChatError>;
