//! 翻译流水线
//!
//! 每条消息的状态机：`pending → success | failed`，`failed` 可通过重试回到 `pending`。
//!
//! - [`TranslationPipeline::submit`] 在后台执行，创建消息的调用方不等待结果
//! - [`TranslationPipeline::retry`] 由调用方等待，直接返回本次尝试的结果
//!
//! 同一条消息的尝试通过单飞锁串行执行，按获取锁的顺序依次完成，最后完成的写入生效。
//! 不做自动重试、退避或限流。

use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;
use tokio::task::JoinSet;

use crate::chat::error::{ChatError, ChatResult};
use crate::chat::message::{Message, TranslationStatus};
use crate::storage::MessageStore;
use crate::translation::Translator;

/// 翻译流水线，克隆后共享同一组锁和后台任务
#[derive(Clone)]
pub struct TranslationPipeline {
    store: Arc<dyn MessageStore>,
    translator: Translator,
    locks: Arc<DashMap<i64, Arc<tokio::sync::Mutex<()>>>>,
    tasks: Arc<Mutex<JoinSet<()>>>,
}

impl TranslationPipeline {
    pub fn new(store: Arc<dyn MessageStore>, translator: Translator) -> Self {
        Self {
            store,
            translator,
            locks: Arc::new(DashMap::new()),
            tasks: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    /// 为新消息发起后台翻译，立即返回
    ///
    /// 没有目标语言的消息被忽略，保持 `pending`。
    pub fn submit(&self, message: &Message) {
        let Some(target) = message.target_language.clone() else {
            tracing::debug!("消息 {} 没有目标语言，不翻译", message.id);
            return;
        };

        let pipeline = self.clone();
        let id = message.id;
        let text = message.original_text.clone();

        let mut tasks = self.tasks();
        reap_finished(&mut tasks);
        tasks.spawn(async move {
            // 失败已经记录为 failed，这里只需要日志
            if let Err(e) = pipeline.run_attempt(id, &text, &target).await {
                tracing::debug!("后台翻译结束: id={}, {}", id, e);
            }
        });
    }

    /// 重试一条消息的翻译并等待结果
    ///
    /// 消息不存在时返回 [`ChatError::NotFound`]，存储保持不变。
    pub async fn retry(&self, id: i64, target_language: &str) -> ChatResult<Message> {
        let message = self.store.get(id)?.ok_or(ChatError::NotFound(id))?;

        // 先回到 pending，调用方在尝试完成前即可观察到
        self.store
            .update_translation(id, "", "", TranslationStatus::Pending)?;
        tracing::info!("重试翻译: id={}, target={}", id, target_language);

        self.run_attempt(id, &message.original_text, target_language)
            .await
    }

    /// 等待所有后台尝试完成
    pub async fn wait_idle(&self) {
        loop {
            let mut drained = std::mem::take(&mut *self.tasks());
            if drained.is_empty() {
                break;
            }

            while let Some(result) = drained.join_next().await {
                if let Err(e) = result {
                    tracing::error!("后台翻译任务异常退出: {}", e);
                }
            }
        }
    }

    /// 仍在跟踪中的后台尝试数量
    pub fn in_flight(&self) -> usize {
        let mut tasks = self.tasks();
        reap_finished(&mut tasks);
        tasks.len()
    }

    fn tasks(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 单次尝试：持有该消息的锁，调用适配器，写入最终状态
    async fn run_attempt(&self, id: i64, text: &str, target: &str) -> ChatResult<Message> {
        let lock = self
            .locks
            .entry(id)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock().await;
            self.attempt(id, text, target).await
        };

        drop(lock);
        self.locks.remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);

        result
    }

    async fn attempt(&self, id: i64, text: &str, target: &str) -> ChatResult<Message> {
        match self.translator.translate(text, target).await {
            Ok(translation) => {
                let message = self.store.update_translation(
                    id,
                    &translation.translated_text,
                    &translation.detected_language,
                    TranslationStatus::Success,
                )?;
                tracing::info!(
                    "翻译成功: id={}, {}|{}",
                    id,
                    translation.detected_language,
                    target
                );
                Ok(message)
            }
            Err(e) => {
                tracing::warn!("翻译失败: id={}, target={}: {}", id, target, e);
                self.store
                    .update_translation(id, "", "", TranslationStatus::Failed)?;
                Err(ChatError::Provider(e))
            }
        }
    }
}

fn reap_finished(tasks: &mut JoinSet<()>) {
    while let Some(result) = tasks.try_join_next() {
        if let Err(e) = result {
            tracing::error!("后台翻译任务异常退出: {}", e);
        }
    }
}
