//! 语言列表处理器

use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::translation::Language;
use crate::web::types::AppState;

/// GET /api/languages
pub async fn list_languages(State(state): State<Arc<AppState>>) -> Json<&'static [Language]> {
    Json(state.service.languages())
}
