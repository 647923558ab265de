//! Web 路由处理器

pub mod languages;
pub mod messages;

pub use languages::*;
pub use messages::*;

use axum::{http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::chat::{ChatError, ValidationErrors};

/// 处理器统一的错误响应
pub type ApiError = (StatusCode, Json<Value>);
pub type ApiResult<T> = Result<Json<T>, ApiError>;

fn error_body(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "message": message })))
}

pub(crate) fn bad_request(message: &str) -> ApiError {
    error_body(StatusCode::BAD_REQUEST, message)
}

pub(crate) fn validation_error(errors: ValidationErrors) -> ApiError {
    let body = serde_json::to_value(&errors)
        .unwrap_or_else(|_| json!({ "message": errors.message }));
    (StatusCode::BAD_REQUEST, Json(body))
}

/// 把服务错误映射为 HTTP 响应；`context` 用作 500 时的提示
pub(crate) fn chat_error(error: ChatError, context: &str) -> ApiError {
    match error {
        ChatError::Validation(errors) => validation_error(errors),
        ChatError::NotFound(_) => error_body(StatusCode::NOT_FOUND, "Message not found"),
        ChatError::Provider(e) => {
            tracing::warn!("{}: {}", context, e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Translation failed")
        }
        ChatError::Store(e) => {
            tracing::error!("{}: {}", context, e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, context)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoreError;
    use crate::translation::ProviderError;

    #[test]
    fn test_error_mapping() {
        let (status, Json(body)) = chat_error(ChatError::NotFound(1), "Failed");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Message not found");

        let (status, Json(body)) = chat_error(
            ChatError::Provider(ProviderError::Malformed("x".into())),
            "Failed",
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Translation failed");

        let (status, Json(body)) = chat_error(
            ChatError::Store(StoreError::Unavailable("poisoned".into())),
            "Failed to fetch messages",
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to fetch messages");
    }
}
