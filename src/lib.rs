//! # chat-translate
//!
//! 双人聊天服务：自动检测消息语言并翻译到对方的语言。
//!
//! ## 模块组织
//!
//! - `env` - 类型安全的环境变量
//! - `translation` - 语言检测与翻译提供方适配器
//! - `storage` - 消息存储契约与内存实现
//! - `chat` - 消息模型、翻译流水线与消息服务
//! - `client` - 轮询客户端与本地视图合并
//! - `web` - HTTP API（可选）

pub mod chat;
pub mod client;
pub mod env;
pub mod storage;
pub mod translation;
#[cfg(feature = "web")]
pub mod web;

pub use chat::{ChatError, Message, MessageService, TranslationPipeline, TranslationStatus};
pub use storage::{InMemoryMessageStore, MessageStore, StoreError};
pub use translation::{ProviderError, Translator};
