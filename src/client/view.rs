//! 客户端本地会话视图

use chrono::{DateTime, Utc};

use crate::chat::message::{Message, TranslationStatus};
use crate::storage::sort_messages;

/// 本地消息列表与轮询游标
///
/// 合并按 id 去重，同一条消息的新副本覆盖旧副本，因此状态变化
/// （`pending → success`）在下一次轮询后可见。乱序、重复投递都是安全的。
#[derive(Debug, Clone, Default)]
pub struct ConversationView {
    messages: Vec<Message>,
    cursor: Option<DateTime<Utc>>,
}

impl ConversationView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// 下一次增量轮询使用的时间戳：已见过的最新消息时间
    pub fn cursor(&self) -> Option<DateTime<Utc>> {
        self.cursor
    }

    pub fn get(&self, id: i64) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// 是否还有等待翻译结果的消息
    ///
    /// 没有目标语言的消息会一直停留在 `pending`，不计入。
    pub fn awaiting_translation(&self) -> bool {
        self.messages.iter().any(|m| {
            m.translation_status == TranslationStatus::Pending && m.target_language.is_some()
        })
    }

    /// 合并一批消息，返回新增或发生变化的条数
    pub fn merge(&mut self, batch: impl IntoIterator<Item = Message>) -> usize {
        let mut changed = 0;

        for incoming in batch {
            if self.cursor.map_or(true, |cursor| incoming.timestamp > cursor) {
                self.cursor = Some(incoming.timestamp);
            }

            match self.messages.iter_mut().find(|m| m.id == incoming.id) {
                Some(existing) if *existing == incoming => {}
                Some(existing) => {
                    *existing = incoming;
                    changed += 1;
                }
                None => {
                    self.messages.push(incoming);
                    changed += 1;
                }
            }
        }

        if changed > 0 {
            sort_messages(&mut self.messages);
        }
        changed
    }
}
