//! 消息数据模型与请求校验

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 每条消息的翻译状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStatus {
    Pending,
    Success,
    Failed,
}

impl TranslationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationStatus::Pending => "pending",
            TranslationStatus::Success => "success",
            TranslationStatus::Failed => "failed",
        }
    }

    /// 只有失败的消息会向用户展示重试入口
    pub fn is_retryable(&self) -> bool {
        matches!(self, TranslationStatus::Failed)
    }
}

impl fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 聊天消息
///
/// 除译文、检测语言和状态之外的字段在创建后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub sender_name: String,
    pub sender_initials: String,
    pub original_text: String,
    pub target_language: Option<String>,
    pub detected_language: Option<String>,
    pub translated_text: Option<String>,
    pub translation_status: TranslationStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_from_current_user: bool,
}

/// 通过校验的创建载荷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub sender_name: String,
    pub sender_initials: String,
    pub original_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
    #[serde(default)]
    pub is_from_current_user: bool,
}

/// 创建消息请求（未校验）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateMessageRequest {
    pub sender_name: Option<String>,
    pub sender_initials: Option<String>,
    pub original_text: Option<String>,
    pub target_language: Option<String>,
    pub is_from_current_user: Option<bool>,
}

/// 重试翻译请求（未校验）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryRequest {
    pub target_language: Option<String>,
}

/// 单个字段的校验错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 请求校验失败
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}: {}", summarize(.errors))]
pub struct ValidationErrors {
    pub message: String,
    pub errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationErrors {
    pub fn new(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            message: message.into(),
            errors,
        }
    }
}

const INVALID_MESSAGE: &str = "Invalid message data";
const MISSING_TARGET: &str = "Target language is required";

/// 去除首尾空白，空串视为缺失
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 只用于判断是否为空白，原样保留内容
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl CreateMessageRequest {
    /// 校验并转换为 [`NewMessage`]
    pub fn validate(self) -> Result<NewMessage, ValidationErrors> {
        let mut errors = Vec::new();

        let mut required = |field: &str, value: Option<String>| {
            let value = non_blank(value);
            if value.is_none() {
                errors.push(FieldError::new(field, "is required"));
            }
            value.unwrap_or_default()
        };

        let sender_name = required("senderName", self.sender_name);
        let sender_initials = required("senderInitials", self.sender_initials);
        let original_text = required("originalText", self.original_text);

        if !errors.is_empty() {
            return Err(ValidationErrors::new(INVALID_MESSAGE, errors));
        }

        Ok(NewMessage {
            sender_name,
            sender_initials,
            original_text,
            target_language: non_empty(self.target_language),
            is_from_current_user: self.is_from_current_user.unwrap_or(false),
        })
    }
}

impl RetryRequest {
    /// 返回目标语言
    pub fn validate(self) -> Result<String, ValidationErrors> {
        non_empty(self.target_language).ok_or_else(|| {
            ValidationErrors::new(
                MISSING_TARGET,
                vec![FieldError::new("targetLanguage", "is required")],
            )
        })
    }
}

impl ValidationErrors {
    /// 请求体本身无法解析时使用
    pub fn malformed_body(details: impl Into<String>) -> Self {
        Self::new(INVALID_MESSAGE, vec![FieldError::new("body", details)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, initials: &str, text: &str) -> CreateMessageRequest {
        CreateMessageRequest {
            sender_name: Some(name.to_string()),
            sender_initials: Some(initials.to_string()),
            original_text: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_request_keeps_text_as_submitted() {
        let mut req = request(" Alice ", "A", "  indented\n    code\n");
        req.target_language = Some(" en ".to_string());

        let message = req.validate().unwrap();
        assert_eq!(message.sender_name, " Alice ");
        assert_eq!(message.original_text, "  indented\n    code\n");
        assert_eq!(message.target_language.as_deref(), Some("en"));
        assert!(!message.is_from_current_user);
    }

    #[test]
    fn test_empty_target_language_is_absent() {
        let mut req = request("Alice", "A", "hi");
        req.target_language = Some("   ".to_string());
        assert_eq!(req.validate().unwrap().target_language, None);
    }

    #[test]
    fn test_missing_fields_are_reported_together() {
        let err = request("", "A", "  ").validate().unwrap_err();
        assert_eq!(err.message, "Invalid message data");

        let fields: Vec<_> = err.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["senderName", "originalText"]);
    }

    #[test]
    fn test_retry_requires_target_language() {
        let err = RetryRequest::default().validate().unwrap_err();
        assert_eq!(err.message, "Target language is required");
        assert_eq!(err.errors[0].field, "targetLanguage");

        let ok = RetryRequest {
            target_language: Some("fr".to_string()),
        };
        assert_eq!(ok.validate().unwrap(), "fr");
    }

    #[test]
    fn test_message_wire_format_is_camel_case() {
        let message = Message {
            id: 7,
            sender_name: "Bob".to_string(),
            sender_initials: "B".to_string(),
            original_text: "Hello".to_string(),
            target_language: Some("es".to_string()),
            detected_language: None,
            translated_text: None,
            translation_status: TranslationStatus::Pending,
            timestamp: "2024-05-01T12:00:00.250Z".parse().unwrap(),
            is_from_current_user: true,
        };

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["senderName"], "Bob");
        assert_eq!(json["translationStatus"], "pending");
        assert_eq!(json["isFromCurrentUser"], true);
        assert!(json["translatedText"].is_null());

        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back, message);
    }

    #[test]
    fn test_display_lists_fields() {
        let err = ValidationErrors::new(
            "Invalid message data",
            vec![FieldError::new("senderName", "is required")],
        );
        assert_eq!(err.to_string(), "Invalid message data: senderName is required");
    }
}
