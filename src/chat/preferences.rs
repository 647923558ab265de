//! 客户端用户偏好

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chat::message::NewMessage;
use crate::translation::languages;

pub const MIN_QUALITY_LEVEL: u8 = 1;
pub const MAX_QUALITY_LEVEL: u8 = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreferencesError {
    #[error("unsupported language '{0}'")]
    UnsupportedLanguage(String),

    #[error("quality level must be between 1 and 3, got {0}")]
    QualityLevel(u8),
}

/// 用户偏好，只有解析后的目标语言会发送到服务端
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub user_language: String,
    pub target_language: String,
    pub auto_translate: bool,
    pub show_original: bool,
    pub auto_detect: bool,
    pub quality_level: u8,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            user_language: "en".to_string(),
            target_language: "es".to_string(),
            auto_translate: true,
            show_original: true,
            auto_detect: true,
            quality_level: 2,
        }
    }
}

impl UserPreferences {
    pub fn validate(&self) -> Result<(), PreferencesError> {
        for code in [&self.user_language, &self.target_language] {
            if !languages::is_supported(code) {
                return Err(PreferencesError::UnsupportedLanguage(code.clone()));
            }
        }

        if !(MIN_QUALITY_LEVEL..=MAX_QUALITY_LEVEL).contains(&self.quality_level) {
            return Err(PreferencesError::QualityLevel(self.quality_level));
        }

        Ok(())
    }

    /// 关闭自动翻译时没有目标语言
    pub fn resolved_target_language(&self) -> Option<&str> {
        self.auto_translate.then_some(self.target_language.as_str())
    }

    /// 以当前用户身份构造一条新消息
    pub fn compose(
        &self,
        sender_name: impl Into<String>,
        sender_initials: impl Into<String>,
        text: impl Into<String>,
    ) -> NewMessage {
        NewMessage {
            sender_name: sender_name.into(),
            sender_initials: sender_initials.into(),
            original_text: text.into(),
            target_language: self.resolved_target_language().map(str::to_string),
            is_from_current_user: true,
        }
    }
}
