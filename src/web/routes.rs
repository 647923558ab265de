//! Web 路由定义

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::web::{config::WebConfig, handlers::*, types::AppState};

/// API 路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/messages", get(list_messages).post(create_message))
        .route("/api/messages/since", get(list_messages_since))
        .route("/api/messages/:id/translate", post(retry_translation))
        .route("/api/languages", get(list_languages))
}

/// 完整路由器：API + CORS + 请求追踪 + 可选的客户端静态文件
pub fn create_router(app_state: Arc<AppState>, config: &WebConfig) -> Router {
    let mut app = create_routes().with_state(app_state);

    if let Some(static_dir) = &config.static_dir {
        // 单页应用：未知路径回退到 index.html
        let index = std::path::Path::new(static_dir).join("index.html");
        app = app.fallback_service(ServeDir::new(static_dir).fallback(ServeFile::new(index)));
    }

    app.layer(cors_layer(config)).layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &WebConfig) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("忽略无效的 CORS 源: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
