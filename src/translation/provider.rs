//! 翻译提供方适配器
//!
//! [`Translator`] 负责：检测源语言 → 源语言与目标语言相同时直接返回原文 →
//! 否则通过 [`TranslationBackend`] 发起一次有超时限制的请求。适配器内部不重试，
//! 重试是用户层面的动作。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::translation::config::TranslationConfig;
use crate::translation::detector::LanguageDetector;
use crate::translation::error::{ProviderError, ProviderResult};

/// 一次成功翻译的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub translated_text: String,
    pub detected_language: String,
}

/// 外部翻译后端
///
/// 一次调用对应一次出站请求，以 `source|target` 语言对为键。
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str) -> ProviderResult<String>;

    /// 用于日志
    fn name(&self) -> &str {
        "backend"
    }
}

/// MyMemory 兼容的翻译 API
///
/// `GET {api_url}?q=<text>&langpair=<source>|<target>`
pub struct MyMemoryBackend {
    client: reqwest::Client,
    api_url: String,
    contact_email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_data: Option<MyMemoryData>,
    response_status: serde_json::Value,
    response_details: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryData {
    translated_text: Option<String>,
}

impl MyMemoryBackend {
    pub fn new(config: &TranslationConfig) -> ProviderResult<Self> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| ProviderError::Network(format!("无效的 User-Agent: {}", e)))?;
        headers.insert(USER_AGENT, agent);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            contact_email: config.contact_email.clone(),
        })
    }

    fn parse_body(body: &str) -> ProviderResult<String> {
        let response: MyMemoryResponse = serde_json::from_str(body)?;

        // responseStatus 有时是数字，有时是字符串
        let status = match &response.response_status {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| {
            ProviderError::Malformed(format!(
                "unexpected responseStatus: {}",
                response.response_status
            ))
        })?;

        if status != 200 {
            let details = match response.response_details {
                Some(serde_json::Value::String(s)) => s,
                Some(other) => other.to_string(),
                None => String::new(),
            };
            return Err(ProviderError::Api { status, details });
        }

        response
            .response_data
            .and_then(|data| data.translated_text)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ProviderError::Malformed("missing translatedText".to_string()))
    }
}

#[async_trait]
impl TranslationBackend for MyMemoryBackend {
    async fn translate(&self, text: &str, source: &str, target: &str) -> ProviderResult<String> {
        let langpair = format!("{}|{}", source, target);
        let mut query = vec![("q", text), ("langpair", langpair.as_str())];
        if let Some(email) = &self.contact_email {
            query.push(("de", email.as_str()));
        }

        let response = self.client.get(&self.api_url).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let body = response.text().await?;
        Self::parse_body(&body)
    }

    fn name(&self) -> &str {
        "mymemory"
    }
}

/// 翻译适配器：语言检测 + 后端调用 + 超时
#[derive(Clone)]
pub struct Translator {
    detector: LanguageDetector,
    backend: Arc<dyn TranslationBackend>,
    timeout: Duration,
}

impl Translator {
    pub fn new(backend: Arc<dyn TranslationBackend>, timeout: Duration) -> Self {
        Self {
            detector: LanguageDetector::new(),
            backend,
            timeout,
        }
    }

    /// 使用配置创建基于 MyMemory 的适配器
    pub fn from_config(config: &TranslationConfig) -> ProviderResult<Self> {
        let backend = MyMemoryBackend::new(config)?;
        Ok(Self::new(Arc::new(backend), config.timeout()))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 翻译文本到目标语言
    pub async fn translate(&self, text: &str, target_language: &str) -> ProviderResult<Translation> {
        let detected = self.detector.detect(text);

        if detected == target_language {
            tracing::debug!("源语言与目标语言相同 ({})，跳过翻译", detected);
            return Ok(Translation {
                translated_text: text.to_string(),
                detected_language: detected.to_string(),
            });
        }

        tracing::debug!(
            backend = self.backend.name(),
            "翻译请求: {}|{}",
            detected,
            target_language
        );

        let translated = tokio::time::timeout(
            self.timeout,
            self.backend.translate(text, detected, target_language),
        )
        .await
        .map_err(|_| ProviderError::Timeout(self.timeout))??;

        Ok(Translation {
            translated_text: translated,
            detected_language: detected.to_string(),
        })
    }
}
