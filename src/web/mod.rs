//! Web 服务器模块
//!
//! 通过 HTTP API 暴露消息服务，供轮询客户端使用

pub mod config;
pub mod handlers;
pub mod routes;
pub mod types;

pub use config::*;
pub use routes::*;
pub use types::*;

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::chat::MessageService;

/// 服务器错误
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind server to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
    service: MessageService,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig, service: MessageService) -> Self {
        Self { config, service }
    }

    pub fn router(&self) -> axum::Router {
        let app_state = Arc::new(AppState::new(self.service.clone()));
        create_router(app_state, &self.config)
    }

    /// 启动 Web 服务器，收到 Ctrl-C / SIGTERM 后优雅退出
    pub async fn start(self) -> Result<(), ServerError> {
        let addr = self.config.listen_address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve(listener, shutdown_signal()).await
    }

    /// 在已绑定的监听器上运行，直到 `shutdown` 完成
    ///
    /// 退出前等待所有后台翻译结束，避免消息停留在 `pending`。
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();

        if let Ok(addr) = listener.local_addr() {
            tracing::info!("Web server starting at http://{}", addr);
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        let pipeline = self.service.pipeline();
        let pending = pipeline.in_flight();
        if pending > 0 {
            tracing::info!("等待 {} 个后台翻译任务完成", pending);
        }
        pipeline.wait_idle().await;

        tracing::info!("Web server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("无法监听 Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("无法监听 SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("收到退出信号，开始关闭");
}
