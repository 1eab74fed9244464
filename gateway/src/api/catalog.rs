//! カタログ変更API
//!
//! axumのリクエストを呼び出しエンベロープに変換してゲートウェイに渡し、
//! 返ってきたレスポンスをそのままHTTPレスポンスに戻す。

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header::ORIGIN, StatusCode},
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::HashMap;

use super::error::AppError;
use crate::common::error::{GatewayError, GatewayResult};
use crate::common::protocol::{GatewayResponse, InvocationEnvelope};
use crate::common::types::MutationKind;
use crate::AppState;

/// Request bodies larger than this are rejected (function-URL payload limit)
pub const MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

/// `/catalog/write`
pub async fn write(State(state): State<AppState>, request: Request) -> Result<Response, AppError> {
    invoke(&state, MutationKind::Write, request).await
}

/// `/catalog/delete`
pub async fn delete(State(state): State<AppState>, request: Request) -> Result<Response, AppError> {
    invoke(&state, MutationKind::Delete, request).await
}

async fn invoke(state: &AppState, kind: MutationKind, request: Request) -> Result<Response, AppError> {
    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let origin = origin.as_deref();

    // エンベロープ化できない場合もCORSヘッダー付きで返す
    let response = match into_envelope(request).await {
        Ok(envelope) => state.gateway.handle(kind, &envelope).await,
        Err(e) => state.gateway.error_response(kind, &e, origin),
    };

    match into_http_response(response) {
        Ok(response) => Ok(response),
        Err(e) => Ok(into_http_response(state.gateway.error_response(kind, &e, origin))?),
    }
}

/// Converts an HTTP request into an invocation envelope.
///
/// Non-UTF-8 bodies are forwarded base64-encoded. A body that cannot be read
/// (too large, connection error) is an input error.
pub async fn into_envelope(request: Request) -> GatewayResult<InvocationEnvelope> {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| GatewayError::Input(format!("failed to read request body: {e}")))?;

    let mut headers = HashMap::with_capacity(parts.headers.len());
    for (name, value) in &parts.headers {
        if let Ok(value) = value.to_str() {
            headers
                .entry(name.as_str().to_string())
                .or_insert_with(|| value.to_string());
        }
    }

    let (body, is_base64_encoded) = if bytes.is_empty() {
        (None, false)
    } else {
        match std::str::from_utf8(&bytes) {
            Ok(text) => (Some(text.to_string()), false),
            Err(_) => (Some(STANDARD.encode(&bytes)), true),
        }
    };

    Ok(InvocationEnvelope {
        method: parts.method.as_str().to_ascii_uppercase(),
        headers,
        body,
        is_base64_encoded,
    })
}

/// Converts a gateway response into an HTTP response without altering it
pub fn into_http_response(response: GatewayResponse) -> GatewayResult<Response> {
    let status = StatusCode::from_u16(response.status_code)
        .map_err(|e| GatewayError::Internal(format!("invalid status {}: {e}", response.status_code)))?;

    let mut builder = Response::builder().status(status);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
        .body(Body::from(response.body))
        .map_err(|e| GatewayError::Internal(format!("failed to build response: {e}")))
}
