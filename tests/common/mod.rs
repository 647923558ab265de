// 集成测试公共模块
//
// 提供可编排的翻译后端和服务装配

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use chat_translate::chat::{
    CreateMessageRequest, Message, MessageService, TranslationPipeline, TranslationStatus,
};
use chat_translate::storage::{InMemoryMessageStore, MessageStore};
use chat_translate::translation::{ProviderError, ProviderResult, TranslationBackend, Translator};

/// 后端行为
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// 正常翻译（可带延迟）
    Translate,
    /// 提供方报告错误
    Fail,
    /// 永不返回，由适配器超时
    Hang,
}

/// 一次后端调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub text: String,
    pub source: String,
    pub target: String,
}

/// 可编排的翻译后端，记录每次调用
pub struct ScriptedBackend {
    behavior: Mutex<Behavior>,
    delay: Mutex<Duration>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior: Mutex::new(behavior),
            delay: Mutex::new(Duration::ZERO),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

/// 固定的译文表，其余文本加上目标语言前缀
pub fn canned_translation(text: &str, target: &str) -> String {
    match (text, target) {
        ("¡Hola!", "en") => "Hello!".to_string(),
        ("Привет", "en") => "Hi".to_string(),
        _ => format!("[{}] {}", target, text),
    }
}

#[async_trait]
impl TranslationBackend for ScriptedBackend {
    async fn translate(&self, text: &str, source: &str, target: &str) -> ProviderResult<String> {
        self.calls.lock().unwrap().push(Call {
            text: text.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        });

        let behavior = *self.behavior.lock().unwrap();
        let delay = *self.delay.lock().unwrap();

        match behavior {
            Behavior::Translate => {
                tokio::time::sleep(delay).await;
                Ok(canned_translation(text, target))
            }
            Behavior::Fail => Err(ProviderError::Api {
                status: 403,
                details: "INVALID LANGUAGE PAIR".to_string(),
            }),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            }
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// 装配好的测试服务
pub struct TestApp {
    pub store: Arc<InMemoryMessageStore>,
    pub backend: Arc<ScriptedBackend>,
    pub service: MessageService,
}

impl TestApp {
    pub fn new(behavior: Behavior) -> Self {
        Self::with_timeout(behavior, Duration::from_millis(200))
    }

    pub fn with_timeout(behavior: Behavior, timeout: Duration) -> Self {
        let store = Arc::new(InMemoryMessageStore::new());
        let backend = ScriptedBackend::new(behavior);
        let translator = Translator::new(backend.clone(), timeout);
        let pipeline = TranslationPipeline::new(store.clone(), translator);
        let service = MessageService::new(store.clone(), pipeline);

        Self {
            store,
            backend,
            service,
        }
    }

    pub async fn settle(&self) {
        self.service.pipeline().wait_idle().await;
    }

    pub fn message(&self, id: i64) -> Message {
        self.store.get(id).unwrap().expect("message exists")
    }

    pub fn status(&self, id: i64) -> TranslationStatus {
        self.message(id).translation_status
    }

    #[cfg(feature = "web")]
    pub fn router(&self) -> axum::Router {
        use chat_translate::web::{create_router, AppState, WebConfig};

        let config = WebConfig {
            bind_addr: "127.0.0.1".to_string(),
            port: 5000,
            static_dir: None,
            cors_origins: vec!["*".to_string()],
        };
        create_router(Arc::new(AppState::new(self.service.clone())), &config)
    }
}

pub fn create_request(text: &str, target: Option<&str>) -> CreateMessageRequest {
    CreateMessageRequest {
        sender_name: Some("Alice".to_string()),
        sender_initials: Some("AL".to_string()),
        original_text: Some(text.to_string()),
        target_language: target.map(str::to_string),
        is_from_current_user: Some(true),
    }
}
