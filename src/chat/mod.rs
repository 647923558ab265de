//! 聊天核心
//!
//! - **message**: 消息模型与请求校验
//! - **pipeline**: 每条消息的翻译状态机
//! - **service**: 创建、列出、重试
//! - **preferences**: 客户端用户偏好

pub mod error;
pub mod message;
pub mod pipeline;
pub mod preferences;
pub mod service;

pub use error::{ChatError, ChatResult};
pub use message::{
    CreateMessageRequest, FieldError, Message, NewMessage, RetryRequest, TranslationStatus,
    ValidationErrors,
};
pub use pipeline::TranslationPipeline;
pub use preferences::{PreferencesError, UserPreferences};
pub use service::MessageService;
