//! 内存消息存储

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, SubsecRound, Utc};

use super::{sort_messages, MessageStore, StoreError, StoreResult};
use crate::chat::message::{Message, NewMessage, TranslationStatus};

#[derive(Debug, Default)]
struct Inner {
    messages: BTreeMap<i64, Message>,
    next_id: i64,
    last_timestamp: Option<DateTime<Utc>>,
}

/// 基于 `RwLock<BTreeMap>` 的存储，进程退出即丢失
#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    inner: RwLock<Inner>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().map(|inner| inner.messages.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Unavailable(format!("读锁失败: {}", e)))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Unavailable(format!("写锁失败: {}", e)))
    }
}

impl MessageStore for InMemoryMessageStore {
    fn create(&self, message: NewMessage) -> StoreResult<Message> {
        let mut inner = self.write()?;

        inner.next_id += 1;
        let id = inner.next_id;

        // 毫秒精度，且不早于上一条消息
        let now = Utc::now().trunc_subsecs(3);
        let timestamp = match inner.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        inner.last_timestamp = Some(timestamp);

        let created = Message {
            id,
            sender_name: message.sender_name,
            sender_initials: message.sender_initials,
            original_text: message.original_text,
            target_language: message.target_language,
            detected_language: None,
            translated_text: None,
            translation_status: TranslationStatus::Pending,
            timestamp,
            is_from_current_user: message.is_from_current_user,
        };

        inner.messages.insert(id, created.clone());
        tracing::debug!("消息已创建: id={}", id);
        Ok(created)
    }

    fn get(&self, id: i64) -> StoreResult<Option<Message>> {
        Ok(self.read()?.messages.get(&id).cloned())
    }

    fn list_all(&self) -> StoreResult<Vec<Message>> {
        let mut messages: Vec<Message> = self.read()?.messages.values().cloned().collect();
        sort_messages(&mut messages);
        Ok(messages)
    }

    fn list_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<Message>> {
        let mut messages: Vec<Message> = self
            .read()?
            .messages
            .values()
            .filter(|m| m.timestamp >= since)
            .cloned()
            .collect();
        sort_messages(&mut messages);
        Ok(messages)
    }

    fn update_translation(
        &self,
        id: i64,
        translated_text: &str,
        detected_language: &str,
        status: TranslationStatus,
    ) -> StoreResult<Message> {
        let mut inner = self.write()?;
        let message = inner.messages.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        message.translated_text = Some(translated_text.to_string());
        message.detected_language = Some(detected_language.to_string());
        message.translation_status = status;

        Ok(message.clone())
    }
}
