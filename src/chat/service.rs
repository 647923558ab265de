//! 消息服务：HTTP 层之下的业务入口

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::chat::error::ChatResult;
use crate::chat::message::{CreateMessageRequest, Message, RetryRequest};
use crate::chat::pipeline::TranslationPipeline;
use crate::storage::MessageStore;
use crate::translation::languages::{Language, SUPPORTED_LANGUAGES};

/// 消息服务
#[derive(Clone)]
pub struct MessageService {
    store: Arc<dyn MessageStore>,
    pipeline: TranslationPipeline,
}

impl MessageService {
    pub fn new(store: Arc<dyn MessageStore>, pipeline: TranslationPipeline) -> Self {
        Self { store, pipeline }
    }

    pub fn pipeline(&self) -> &TranslationPipeline {
        &self.pipeline
    }

    pub fn list_messages(&self) -> ChatResult<Vec<Message>> {
        Ok(self.store.list_all()?)
    }

    /// 增量轮询：`timestamp >= since` 的消息
    pub fn list_messages_since(&self, since: DateTime<Utc>) -> ChatResult<Vec<Message>> {
        Ok(self.store.list_since(since)?)
    }

    /// 校验并创建消息，有目标语言时提交后台翻译
    ///
    /// 返回的消息总是 `pending`，调用方不能假设翻译已经完成。
    pub fn create_message(&self, request: CreateMessageRequest) -> ChatResult<Message> {
        let new_message = request.validate()?;
        let message = self.store.create(new_message)?;

        tracing::info!(
            "新消息: id={}, sender={}, target={}",
            message.id,
            message.sender_name,
            message.target_language.as_deref().unwrap_or("-")
        );

        self.pipeline.submit(&message);
        Ok(message)
    }

    /// 重试翻译，等待本次尝试的最终结果
    pub async fn retry_translation(&self, id: i64, request: RetryRequest) -> ChatResult<Message> {
        let target = request.validate()?;
        self.pipeline.retry(id, &target).await
    }

    pub fn languages(&self) -> &'static [Language] {
        SUPPORTED_LANGUAGES
    }
}
