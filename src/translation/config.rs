//! 翻译配置管理
//!
//! 加载顺序：`.env` 文件 → 配置文件（TOML）→ 环境变量覆盖 → 校验

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::env::{self, EnvVar};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const MAX_TIMEOUT: Duration = Duration::from_secs(120);

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "chat-translate.toml",
        ".chat-translate.toml",
        "~/.config/chat-translate/config.toml",
        "/etc/chat-translate/config.toml",
    ];

    pub const ENV_FILES: &[&str] = &[".env.local", ".env.development", ".env.production", ".env"];
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("访问配置文件 {path} 失败: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("解析TOML配置失败: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("序列化配置失败: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("配置无效: {0}")]
    Invalid(String),

    #[error(transparent)]
    Env(#[from] env::EnvError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 翻译提供方配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub api_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub contact_email: Option<String>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_url: env::translation::DEFAULT_API_URL.to_string(),
            timeout_secs: constants::DEFAULT_TIMEOUT.as_secs(),
            user_agent: env::translation::DEFAULT_USER_AGENT.to_string(),
            contact_email: None,
        }
    }
}

impl TranslationConfig {
    /// 按标准顺序加载配置
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(None)
    }

    /// 与 [`load`](Self::load) 相同，但可以显式指定配置文件
    pub fn load_from(path: Option<&str>) -> ConfigResult<Self> {
        if let Some(env_file) = load_dotenv() {
            tracing::info!("已加载环境变量文件: {}", env_file);
        }

        let mut config = match path.map(str::to_string).or_else(find_config_file) {
            Some(path) => {
                tracing::info!("加载配置文件: {}", path);
                Self::from_file(&path)?
            }
            None => {
                tracing::info!("未找到配置文件，使用默认配置");
                Self::default()
            }
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// 从指定文件加载配置（不应用环境变量）
    pub fn from_file(path: &str) -> ConfigResult<Self> {
        let expanded = shellexpand::tilde(path);
        let content =
            std::fs::read_to_string(expanded.as_ref()).map_err(|source| ConfigError::Io {
                path: expanded.to_string(),
                source,
            })?;

        Ok(toml::from_str(&content)?)
    }

    /// 应用环境变量覆盖；只有显式设置的变量才会生效
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        use crate::env::translation::{ApiUrl, ContactEmail, Timeout, UserAgent};

        if let Some(api_url) = ApiUrl::get_optional()? {
            tracing::info!("环境变量覆盖 API URL: {}", api_url);
            self.api_url = api_url;
        }

        if let Some(timeout) = Timeout::get_optional()? {
            self.timeout_secs = timeout.as_secs();
        }

        if let Some(user_agent) = UserAgent::get_optional()? {
            self.user_agent = user_agent;
        }

        if let Some(email) = ContactEmail::get_optional()? {
            self.contact_email = Some(email);
        }

        Ok(())
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        url::Url::parse(&self.api_url)
            .map_err(|e| ConfigError::Invalid(format!("API URL 无效 '{}': {}", self.api_url, e)))?;

        if self.timeout_secs == 0 || self.timeout() > constants::MAX_TIMEOUT {
            return Err(ConfigError::Invalid(format!(
                "超时必须在 1 到 {} 秒之间",
                constants::MAX_TIMEOUT.as_secs()
            )));
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("User-Agent 不能为空".to_string()));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 生成示例配置文件
    pub fn write_example(path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(&Self::default())?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

fn find_config_file() -> Option<String> {
    constants::CONFIG_PATHS
        .iter()
        .map(|path| shellexpand::tilde(path).into_owned())
        .find(|path| Path::new(path).exists())
}

/// 加载 .env 文件，找到第一个即停止
/// 加载第一个存在的 `.env` 文件，返回其文件名
///
/// 已存在的进程环境变量不会被覆盖。需要在读取任何环境变量（包括日志级别）之前调用。
pub fn load_dotenv() -> Option<&'static str> {
    constants::ENV_FILES
        .iter()
        .copied()
        .find(|env_file| Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok())
}
