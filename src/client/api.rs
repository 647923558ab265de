//! HTTP 客户端

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::chat::message::{Message, NewMessage};
use crate::client::view::ConversationView;

/// 默认轮询间隔
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with {status}: {message}")]
    Server { status: u16, message: String },

    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// 服务端返回的 HTTP 状态码
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::InvalidUrl(_) => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// 服务端语言列表中的一项
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct LanguageEntry {
    pub code: String,
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RetryBody<'a> {
    target_language: &'a str,
}

/// 聊天服务的 HTTP 客户端
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base: Url,
}

impl ChatClient {
    /// `base_url` 形如 `http://127.0.0.1:5000`
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> ClientResult<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base.join(path)?)
    }

    pub async fn fetch_all(&self) -> ClientResult<Vec<Message>> {
        let url = self.endpoint("api/messages")?;
        decode(self.http.get(url).send().await?).await
    }

    pub async fn fetch_since(&self, since: DateTime<Utc>) -> ClientResult<Vec<Message>> {
        let url = self.endpoint("api/messages/since")?;
        let timestamp = since.to_rfc3339_opts(SecondsFormat::Millis, true);
        decode(
            self.http
                .get(url)
                .query(&[("timestamp", timestamp)])
                .send()
                .await?,
        )
        .await
    }

    /// 发送消息，返回的消息处于 `pending`
    pub async fn send_message(&self, message: &NewMessage) -> ClientResult<Message> {
        let url = self.endpoint("api/messages")?;
        decode(self.http.post(url).json(message).send().await?).await
    }

    /// 重试翻译，返回最终状态
    pub async fn retry_translation(&self, id: i64, target_language: &str) -> ClientResult<Message> {
        let url = self.endpoint(&format!("api/messages/{}/translate", id))?;
        let body = RetryBody { target_language };
        decode(self.http.post(url).json(&body).send().await?).await
    }

    pub async fn languages(&self) -> ClientResult<Vec<LanguageEntry>> {
        let url = self.endpoint("api/languages")?;
        decode(self.http.get(url).send().await?).await
    }

    /// 执行一次轮询并合并到视图，返回变化的条数
    ///
    /// 首次轮询取全量；之后按游标增量获取。视图中仍有等待翻译的消息时额外取一次全量，
    /// 因为早于游标的消息状态变化不会出现在增量结果里。
    pub async fn poll(&self, view: &mut ConversationView) -> ClientResult<usize> {
        let mut changed = match view.cursor() {
            None => view.merge(self.fetch_all().await?),
            Some(cursor) => view.merge(self.fetch_since(cursor).await?),
        };

        if view.awaiting_translation() {
            changed += view.merge(self.fetch_all().await?);
        }

        Ok(changed)
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    Err(ClientError::Server {
        status: status.as_u16(),
        message: error_message(status, response).await,
    })
}

async fn error_message(status: StatusCode, response: reqwest::Response) -> String {
    let fallback = status.canonical_reason().unwrap_or("unknown error").to_string();
    match response.json::<serde_json::Value>().await {
        Ok(body) => body
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or(fallback),
        Err(_) => fallback,
    }
}

/// 以固定间隔轮询，直到 `shutdown` 完成
///
/// 单次轮询失败只记录日志，下一次照常进行。每次视图变化后调用 `on_change`。
pub async fn run_sync_loop<S, F>(
    client: &ChatClient,
    view: &mut ConversationView,
    interval: Duration,
    shutdown: S,
    mut on_change: F,
) where
    S: Future<Output = ()>,
    F: FnMut(&ConversationView),
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::debug!("同步循环退出");
                break;
            }
            _ = ticker.tick() => {
                match client.poll(view).await {
                    Ok(0) => {}
                    Ok(changed) => {
                        tracing::debug!("同步到 {} 条变化", changed);
                        on_change(view);
                    }
                    Err(e) => tracing::warn!("轮询失败: {}", e),
                }
            }
        }
    }
}
