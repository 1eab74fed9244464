//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use axum::{response::IntoResponse, Json};
use serde_json::json;
use tracing::error;

use crate::common::error::GatewayError;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub GatewayError);

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // 内部詳細はログのみに出し、レスポンスにはexternal_message()を使う
        if let GatewayError::Internal(detail) = &self.0 {
            error!("Internal error: {}", detail);
        }
        let payload = json!({
            "error": self.0.external_message()
        });
        (self.0.status_code(), Json(payload)).into_response()
    }
}
