//! Web 模块的数据类型定义

use serde::Deserialize;

use crate::chat::MessageService;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub service: MessageService,
}

impl AppState {
    pub fn new(service: MessageService) -> Self {
        Self { service }
    }
}

/// `/api/messages/since` 查询参数
#[derive(Debug, Default, Deserialize)]
pub struct SinceQuery {
    pub timestamp: Option<String>,
}
