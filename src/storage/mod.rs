//! 消息存储
//!
//! 只定义查询契约 [`MessageStore`]，具体引擎可替换。内置 [`InMemoryMessageStore`]。
//!
//! 契约要求：
//! - `id` 由存储分配，严格递增
//! - `timestamp` 由存储分配，按 `id` 顺序不递减
//! - 所有列表按 `(timestamp, id)` 升序返回
//! - `list_since` 包含边界：`timestamp >= since`

pub mod memory;

pub use memory::InMemoryMessageStore;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::chat::message::{Message, NewMessage, TranslationStatus};

/// 存储错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("message {0} not found")]
    NotFound(i64),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 消息存储契约
///
/// 所有方法都是同步且短暂的，实现不得在内部等待网络。
pub trait MessageStore: Send + Sync {
    /// 分配 id 与时间戳并插入，状态为 `pending`
    fn create(&self, message: NewMessage) -> StoreResult<Message>;

    fn get(&self, id: i64) -> StoreResult<Option<Message>>;

    fn list_all(&self) -> StoreResult<Vec<Message>>;

    /// `timestamp >= since` 的消息
    fn list_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<Message>>;

    /// 只更新译文、检测语言与状态三个字段
    fn update_translation(
        &self,
        id: i64,
        translated_text: &str,
        detected_language: &str,
        status: TranslationStatus,
    ) -> StoreResult<Message>;
}

/// 按 `(timestamp, id)` 排序
pub(crate) fn sort_messages(messages: &mut [Message]) {
    messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
}
