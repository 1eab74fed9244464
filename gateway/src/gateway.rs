//! 呼び出し単位のリクエスト処理パイプライン
//!
//! エンベロープ → 正規化 → (preflightは即応答) → ディスパッチ → CORSヘッダー付きレスポンス

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{error, warn};

use crate::common::error::{GatewayError, GatewayResult};
use crate::common::protocol::{ErrorResponse, GatewayResponse, InvocationEnvelope, JSON_CONTENT_TYPE};
use crate::common::types::MutationKind;
use crate::cors::CorsPolicy;
use crate::dispatcher::MutationDispatcher;
use crate::normalizer::{self, DeleteRequest, RequestHeaders, WriteRequest};

/// Name reported when the object-store destination is missing
pub const BUCKET_SETTING: &str = "BUCKET_NAME";

/// Handles write/delete invocations for the catalog
#[derive(Debug, Clone)]
pub struct CatalogGateway {
    cors: CorsPolicy,
    dispatcher: Option<MutationDispatcher>,
}

impl CatalogGateway {
    /// `dispatcher` is `None` when no bucket is configured; every mutation
    /// then answers 500.
    pub fn new(cors: CorsPolicy, dispatcher: Option<MutationDispatcher>) -> Self {
        Self { cors, dispatcher }
    }

    /// CORS policy in effect
    pub fn cors(&self) -> &CorsPolicy {
        &self.cors
    }

    /// Handles one invocation. Never fails: every error becomes a response.
    pub async fn handle(&self, kind: MutationKind, envelope: &InvocationEnvelope) -> GatewayResponse {
        let headers = RequestHeaders::from_raw(&envelope.headers);
        let origin = headers.origin();

        if normalizer::is_preflight(envelope) {
            return GatewayResponse {
                status_code: 204,
                headers: self.cors_headers(origin),
                body: String::new(),
            };
        }

        match self.process(kind, envelope, &headers).await {
            Ok(body) => self.json_response(200, body, origin),
            Err(e) => self.error_response(kind, &e, origin),
        }
    }

    /// Error response carrying the same JSON and CORS headers as any other
    /// response. Also used by the HTTP layer for failures that happen before
    /// an envelope exists.
    pub fn error_response(
        &self,
        kind: MutationKind,
        error: &GatewayError,
        origin: Option<&str>,
    ) -> GatewayResponse {
        match error {
            GatewayError::Configuration(_) | GatewayError::Store(_) | GatewayError::Internal(_) => {
                error!("{} request failed: {}", kind, error)
            }
            GatewayError::NamespaceViolation { key, .. } => {
                warn!("{} request rejected for key {}: {}", kind, key, error)
            }
            _ => warn!("{} request rejected: {}", kind, error),
        }
        let body = to_json(&ErrorResponse {
            error: error.external_message(),
        });
        self.json_response(error.status_code().as_u16(), body, origin)
    }

    async fn process(
        &self,
        kind: MutationKind,
        envelope: &InvocationEnvelope,
        headers: &RequestHeaders,
    ) -> GatewayResult<String> {
        let dispatcher = self
            .dispatcher
            .as_ref()
            .ok_or_else(|| GatewayError::Configuration(BUCKET_SETTING.to_string()))?;

        // メソッド不明（トランスポートが渡さない場合）はPOSTとして扱う
        if !envelope.method.is_empty() && !envelope.method.eq_ignore_ascii_case("POST") {
            return Err(GatewayError::MethodNotAllowed(envelope.method.clone()));
        }

        let payload = normalizer::parse_body(envelope)?;
        let identity = headers.identity();

        match kind {
            MutationKind::Write => {
                let request = WriteRequest::from_payload(&payload)?;
                let response = dispatcher.write(&request, &identity).await?;
                Ok(to_json(&response))
            }
            MutationKind::Delete => {
                let request = DeleteRequest::from_payload(&payload)?;
                let response = dispatcher.delete(&request, &identity).await?;
                Ok(to_json(&response))
            }
        }
    }

    fn cors_headers(&self, origin: Option<&str>) -> BTreeMap<String, String> {
        self.cors
            .headers(origin)
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    fn json_response(&self, status_code: u16, body: String, origin: Option<&str>) -> GatewayResponse {
        let mut headers = self.cors_headers(origin);
        headers.insert("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string());
        GatewayResponse {
            status_code,
            headers,
            body,
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        error!("Failed to serialize response: {}", e);
        r#"{"error":"internal error"}"#.to_string()
    })
}
