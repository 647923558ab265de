//! 统一的环境变量管理系统
//!
//! 为服务端和翻译组件提供类型安全、可验证的环境变量访问

use std::env;
use std::time::Duration;

use thiserror::Error;

/// 环境变量解析错误
#[derive(Debug, Clone, Error)]
#[error("Environment variable '{variable}': {message}")]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl EnvError {
    pub(crate) fn new(variable: &str, message: impl Into<String>) -> Self {
        Self {
            variable: variable.to_string(),
            message: message.into(),
        }
    }
}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    /// 未设置时使用的值；无法写成常量的默认值在这里提供
    fn default_value() -> Option<T> {
        Self::DEFAULT
    }

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::default_value().ok_or_else(|| {
                EnvError::new(Self::NAME, "Required environment variable not set")
            }),
        }
    }

    /// 已设置时解析；未设置时返回 `None`，而不是默认值或错误
    fn get_optional() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value).map(Some),
            Err(_) => Ok(None),
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 应用运行模式
    pub struct Mode;
    impl EnvVar<String> for Mode {
        const NAME: &'static str = "CHAT_TRANSLATE_MODE";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Application mode: development, staging, production";

        fn default_value() -> Option<String> {
            Some("production".to_string())
        }

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "development" | "dev" => Ok("development".to_string()),
                "staging" | "stage" => Ok("staging".to_string()),
                "production" | "prod" => Ok("production".to_string()),
                _ => Err(EnvError::new(
                    Self::NAME,
                    format!(
                        "Invalid mode '{}'. Use: development, staging, production",
                        value
                    ),
                )),
            }
        }
    }

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "CHAT_TRANSLATE_LOG_LEVEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn default_value() -> Option<String> {
            Some("info".to_string())
        }

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError::new(
                    Self::NAME,
                    format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                )),
            }
        }
    }
}

/// 翻译服务相关环境变量
pub mod translation {
    use super::*;

    pub const DEFAULT_API_URL: &str = "https://api.mymemory.translated.net/get";
    pub const DEFAULT_USER_AGENT: &str = "ChatTranslate/1.0";

    /// 翻译 API 地址
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "CHAT_TRANSLATE_API_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Translation provider endpoint URL";

        fn default_value() -> Option<String> {
            Some(DEFAULT_API_URL.to_string())
        }

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.to_string())
            } else {
                Err(EnvError::new(
                    Self::NAME,
                    "API URL must start with http:// or https://",
                ))
            }
        }
    }

    /// 单次翻译请求超时
    pub struct Timeout;
    impl EnvVar<Duration> for Timeout {
        const NAME: &'static str = "CHAT_TRANSLATE_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(10));
        const DESCRIPTION: &'static str = "Translation request timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds: u64 = value
                .trim()
                .parse()
                .map_err(|_| EnvError::new(Self::NAME, "Must be a valid number of seconds"))?;

            if seconds == 0 {
                return Err(EnvError::new(Self::NAME, "Timeout must be greater than 0"));
            }

            if seconds > 120 {
                return Err(EnvError::new(
                    Self::NAME,
                    "Timeout too long (max 120 seconds)",
                ));
            }

            Ok(Duration::from_secs(seconds))
        }
    }

    /// 请求头中的 User-Agent
    pub struct UserAgent;
    impl EnvVar<String> for UserAgent {
        const NAME: &'static str = "CHAT_TRANSLATE_USER_AGENT";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "User-Agent sent to the translation provider";

        fn default_value() -> Option<String> {
            Some(DEFAULT_USER_AGENT.to_string())
        }

        fn parse(value: &str) -> EnvResult<String> {
            let agent = value.trim();
            if agent.is_empty() {
                return Err(EnvError::new(Self::NAME, "User-Agent cannot be empty"));
            }
            Ok(agent.to_string())
        }
    }

    /// 联系邮箱（MyMemory 用于提高免费额度）
    pub struct ContactEmail;
    impl EnvVar<String> for ContactEmail {
        const NAME: &'static str = "CHAT_TRANSLATE_CONTACT_EMAIL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Contact email passed to the provider for a larger quota";

        fn parse(value: &str) -> EnvResult<String> {
            let email = value.trim();
            if !email.contains('@') {
                return Err(EnvError::new(Self::NAME, "Not a valid email address"));
            }
            Ok(email.to_string())
        }
    }
}

/// Web服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "CHAT_TRANSLATE_BIND_ADDRESS";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Web server bind address";

        fn default_value() -> Option<String> {
            Some("127.0.0.1".to_string())
        }

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError::new(Self::NAME, "Address cannot be empty"));
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "CHAT_TRANSLATE_PORT";
        const DEFAULT: Option<u16> = Some(5000);
        const DESCRIPTION: &'static str = "Web server port";

        fn parse(value: &str) -> EnvResult<u16> {
            let port: u16 = value.trim().parse().map_err(|_| {
                EnvError::new(Self::NAME, "Must be a valid port number (1-65535)")
            })?;

            if port == 0 {
                return Err(EnvError::new(Self::NAME, "Port cannot be 0"));
            }

            Ok(port)
        }
    }

    /// 静态文件目录（客户端构建产物）
    pub struct StaticDir;
    impl EnvVar<String> for StaticDir {
        const NAME: &'static str = "CHAT_TRANSLATE_STATIC_DIR";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Directory with the client bundle (empty disables it)";

        fn default_value() -> Option<String> {
            Some(String::new())
        }

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.trim().to_string())
        }
    }

    /// CORS允许的源
    pub struct CorsOrigins;
    impl EnvVar<Vec<String>> for CorsOrigins {
        const NAME: &'static str = "CHAT_TRANSLATE_CORS_ORIGINS";
        const DEFAULT: Option<Vec<String>> = None;
        const DESCRIPTION: &'static str = "CORS allowed origins (comma-separated, * for any)";

        fn default_value() -> Option<Vec<String>> {
            Some(vec!["*".to_string()])
        }

        fn parse(value: &str) -> EnvResult<Vec<String>> {
            Ok(value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect())
        }
    }
}

/// 环境变量配置汇总
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub mode: String,
    pub log_level: String,

    pub api_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub contact_email: Option<String>,

    pub bind_address: String,
    pub port: u16,
    pub static_dir: String,
    pub cors_origins: Vec<String>,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            mode: core::Mode::get()?,
            log_level: core::LogLevel::get()?,

            api_url: translation::ApiUrl::get()?,
            timeout: translation::Timeout::get()?,
            user_agent: translation::UserAgent::get()?,
            contact_email: translation::ContactEmail::get_optional()?,

            bind_address: web::BindAddress::get()?,
            port: web::Port::get()?,
            static_dir: web::StaticDir::get()?,
            cors_origins: web::CorsOrigins::get()?,
        })
    }

    /// 打印配置摘要（隐藏敏感信息）
    pub fn print_summary(&self) {
        tracing::info!("Environment configuration summary:");
        tracing::info!("  Mode: {}", self.mode);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Translation API: {} (timeout {:?})", self.api_url, self.timeout);
        if self.contact_email.is_some() {
            tracing::info!("  Contact email: [configured]");
        }
        tracing::info!("  Web server: {}:{}", self.bind_address, self.port);
    }
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables\n\n");

    docs.push_str("## Core\n\n");
    push_doc::<core::Mode, String>(&mut docs);
    push_doc::<core::LogLevel, String>(&mut docs);

    docs.push_str("\n## Translation\n\n");
    push_doc::<translation::ApiUrl, String>(&mut docs);
    push_doc::<translation::Timeout, Duration>(&mut docs);
    push_doc::<translation::UserAgent, String>(&mut docs);
    push_doc::<translation::ContactEmail, String>(&mut docs);

    docs.push_str("\n## Web Server\n\n");
    push_doc::<web::BindAddress, String>(&mut docs);
    push_doc::<web::Port, u16>(&mut docs);
    push_doc::<web::StaticDir, String>(&mut docs);
    push_doc::<web::CorsOrigins, Vec<String>>(&mut docs);

    docs
}

fn push_doc<V: EnvVar<T>, T: std::fmt::Debug>(docs: &mut String) {
    let default = match V::default_value() {
        Some(value) => format!("{:?}", value),
        None => "none".to_string(),
    };
    docs.push_str(&format!(
        "- `{}`: {} (default: {})\n",
        V::NAME,
        V::DESCRIPTION,
        default
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_mode_parsing() {
        assert_eq!(core::Mode::parse("development").unwrap(), "development");
        assert_eq!(core::Mode::parse("PROD").unwrap(), "production");
        assert_eq!(core::Mode::parse("stage").unwrap(), "staging");

        assert!(core::Mode::parse("invalid").is_err());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(core::LogLevel::parse("DEBUG").unwrap(), "debug");
        assert!(core::LogLevel::parse("verbose").is_err());
    }

    #[test]
    fn test_url_validation() {
        assert!(translation::ApiUrl::parse("http://localhost:1188/get").is_ok());
        assert!(translation::ApiUrl::parse(" https://api.mymemory.translated.net/get ").is_ok());

        assert!(translation::ApiUrl::parse("ftp://example.com").is_err());
        assert!(translation::ApiUrl::parse("not-a-url").is_err());
    }

    #[test]
    fn test_timeout_bounds() {
        assert_eq!(
            translation::Timeout::parse("10").unwrap(),
            Duration::from_secs(10)
        );
        assert!(translation::Timeout::parse("0").is_err());
        assert!(translation::Timeout::parse("121").is_err());
        assert!(translation::Timeout::parse("soon").is_err());
    }

    #[test]
    fn test_port_and_origins() {
        assert_eq!(web::Port::parse("8080").unwrap(), 8080);
        assert!(web::Port::parse("0").is_err());
        assert!(web::Port::parse("70000").is_err());

        let origins = web::CorsOrigins::parse("http://a.test, ,http://b.test").unwrap();
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_contact_email_requires_at_sign() {
        assert!(translation::ContactEmail::parse("ops@example.com").is_ok());
        assert!(translation::ContactEmail::parse("ops").is_err());
    }

    #[test]
    fn test_env_docs_list_every_section() {
        let docs = generate_env_docs();
        assert!(docs.contains("CHAT_TRANSLATE_API_URL"));
        assert!(docs.contains("CHAT_TRANSLATE_PORT"));
        assert!(docs.contains("## Web Server"));
    }

    #[test]
    fn test_env_docs_show_effective_defaults() {
        let docs = generate_env_docs();
        assert!(docs.contains("`CHAT_TRANSLATE_MODE`: Application mode: development, staging, production (default: \"production\")"));
        assert!(docs.contains("(default: \"https://api.mymemory.translated.net/get\")"));
        assert!(docs.contains("(default: \"127.0.0.1\")"));
        assert!(docs.contains("(default: [\"*\"])"));
        assert!(docs.contains("(default: 5000)"));
        assert!(docs.contains("`CHAT_TRANSLATE_CONTACT_EMAIL`: Contact email passed to the provider for a larger quota (default: none)"));
        assert!(!docs.contains("default: None"));
    }

    #[test]
    fn test_defaults_match_getters() {
        assert_eq!(core::Mode::default_value().as_deref(), Some("production"));
        assert_eq!(core::LogLevel::default_value().as_deref(), Some("info"));
        assert_eq!(
            translation::UserAgent::default_value().as_deref(),
            Some(translation::DEFAULT_USER_AGENT)
        );
        assert_eq!(web::StaticDir::default_value().as_deref(), Some(""));
        assert_eq!(translation::ContactEmail::default_value(), None);
    }
}
