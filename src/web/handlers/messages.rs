//! 消息相关API处理器

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::Json,
};
use chrono::{DateTime, Utc};

use super::{bad_request, chat_error, validation_error, ApiResult};
use crate::chat::{CreateMessageRequest, FieldError, Message, RetryRequest, ValidationErrors};
use crate::web::types::{AppState, SinceQuery};

/// GET /api/messages
pub async fn list_messages(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Message>> {
    state
        .service
        .list_messages()
        .map(Json)
        .map_err(|e| chat_error(e, "Failed to fetch messages"))
}

/// GET /api/messages/since?timestamp=...
pub async fn list_messages_since(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SinceQuery>,
) -> ApiResult<Vec<Message>> {
    let raw = match query.timestamp.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(bad_request("Timestamp is required")),
    };

    let since = DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            tracing::debug!("无效的时间戳 '{}': {}", raw, e);
            bad_request("Invalid timestamp")
        })?;

    state
        .service
        .list_messages_since(since)
        .map(Json)
        .map_err(|e| chat_error(e, "Failed to fetch new messages"))
}

/// POST /api/messages
///
/// 返回的消息处于 `pending`，翻译在后台进行。
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> ApiResult<Message> {
    let Json(request) = payload.map_err(|rejection| {
        validation_error(ValidationErrors::malformed_body(rejection.body_text()))
    })?;

    state
        .service
        .create_message(request)
        .map(Json)
        .map_err(|e| chat_error(e, "Failed to create message"))
}

/// POST /api/messages/:id/translate
///
/// 等待本次翻译完成，响应反映最终状态。
pub async fn retry_translation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<RetryRequest>, JsonRejection>,
) -> ApiResult<Message> {
    let id: i64 = id
        .trim()
        .parse()
        .map_err(|_| bad_request("Invalid message id"))?;

    let Json(request) = payload.map_err(|rejection| {
        validation_error(ValidationErrors::new(
            "Target language is required",
            vec![FieldError::new("body", rejection.body_text())],
        ))
    })?;

    state
        .service
        .retry_translation(id, request)
        .await
        .map(Json)
        .map_err(|e| chat_error(e, "Translation failed"))
}
