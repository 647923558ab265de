//! Web 服务器配置
//!
//! 使用类型安全的环境变量系统进行配置管理

use crate::env::{EnvError, EnvResult, EnvVar};

/// Web 服务器配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    /// 绑定地址
    pub bind_addr: String,
    /// 端口
    pub port: u16,
    /// 客户端构建产物目录
    pub static_dir: Option<String>,
    /// CORS 允许的源，包含 `*` 时放开全部
    pub cors_origins: Vec<String>,
}

impl WebConfig {
    /// 从环境变量创建配置
    pub fn from_env() -> EnvResult<Self> {
        use crate::env::web;

        let static_dir = web::StaticDir::get()?;

        Ok(Self {
            bind_addr: web::BindAddress::get()?,
            port: web::Port::get()?,
            static_dir: (!static_dir.is_empty()).then_some(static_dir),
            cors_origins: web::CorsOrigins::get()?,
        })
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        use crate::env::web;

        if self.bind_addr.trim().is_empty() {
            return Err(EnvError::new(
                web::BindAddress::NAME,
                "Bind address cannot be empty",
            ));
        }

        if self.port == 0 {
            return Err(EnvError::new(web::Port::NAME, "Port cannot be 0"));
        }

        if let Some(ref static_dir) = self.static_dir {
            if !std::path::Path::new(static_dir).is_dir() {
                tracing::warn!("Static directory '{}' does not exist", static_dir);
            }
        }

        Ok(())
    }

    /// 获取完整的监听地址
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }

    /// 检查是否为本地开发模式
    pub fn is_development(&self) -> bool {
        use crate::env::core;
        core::Mode::get()
            .map(|mode| mode == "development")
            .unwrap_or(false)
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            tracing::warn!("Failed to load web config from environment: {}. Using defaults.", e);
            Self {
                bind_addr: "127.0.0.1".to_string(),
                port: 5000,
                static_dir: None,
                cors_origins: vec!["*".to_string()],
            }
        })
    }
}
