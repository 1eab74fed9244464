//! REST APIハンドラー
//!
//! - `/catalog/write`, `/catalog/delete`: 全メソッドを受け付けゲートウェイに委譲
//! - `GET /healthz`: 死活確認

/// カタログ変更API
pub mod catalog;

/// APIエラーレスポンス型
pub mod error;

use axum::{
    routing::{any, get},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Write endpoint path
pub const WRITE_PATH: &str = "/catalog/write";
/// Delete endpoint path
pub const DELETE_PATH: &str = "/catalog/delete";
/// Health check path
pub const HEALTH_PATH: &str = "/healthz";

/// Builds the application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route(WRITE_PATH, any(catalog::write))
        .route(DELETE_PATH, any(catalog::delete))
        .route(HEALTH_PATH, get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
