//! 翻译模块
//!
//! - **detector**: 基于字符集的语言检测
//! - **languages**: 客户端可选的语言列表
//! - **provider**: 翻译提供方适配器（MyMemory）
//! - **config**: 提供方配置
//! - **error**: 提供方错误类型
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use chat_translate::translation::{TranslationConfig, Translator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TranslationConfig::load()?;
//! let translator = Translator::from_config(&config)?;
//!
//! let result = translator.translate("¡Hola!", "en").await?;
//! println!("{} ({})", result.translated_text, result.detected_language);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod detector;
pub mod error;
pub mod languages;
pub mod provider;

pub use config::{ConfigError, ConfigResult, TranslationConfig};
pub use detector::{detect, LanguageDetector, BASELINE_LANGUAGE};
pub use error::{ProviderError, ProviderResult};
pub use languages::{Language, SUPPORTED_LANGUAGES};
pub use provider::{MyMemoryBackend, Translation, TranslationBackend, Translator};
