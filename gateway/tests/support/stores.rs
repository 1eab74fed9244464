//! インメモリストアで組み立てたゲートウェイとoneshot送信ヘルパー

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use catalog_gateway::audit::{AuditLogger, MemoryAuditLogStore};
use catalog_gateway::cors::CorsPolicy;
use catalog_gateway::dispatcher::MutationDispatcher;
use catalog_gateway::gateway::CatalogGateway;
use catalog_gateway::storage::MemoryObjectStore;
use catalog_gateway::{api, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

#[allow(dead_code)]
pub const BUCKET: &str = "catalog-bucket";
#[allow(dead_code)]
pub const AUDIT_TABLE: &str = "catalog-audit";

/// Router plus handles on its recording stores
#[allow(dead_code)]
pub struct TestApp {
    pub app: Router,
    pub objects: MemoryObjectStore,
    pub audit: MemoryAuditLogStore,
}

#[allow(dead_code)]
pub fn build_app(cors: CorsPolicy) -> TestApp {
    build_app_with(cors, MemoryObjectStore::new(), MemoryAuditLogStore::new())
}

#[allow(dead_code)]
pub fn build_app_with(
    cors: CorsPolicy,
    objects: MemoryObjectStore,
    audit: MemoryAuditLogStore,
) -> TestApp {
    let dispatcher = MutationDispatcher::new(
        Arc::new(objects.clone()),
        BUCKET,
        AuditLogger::new(Arc::new(audit.clone()), AUDIT_TABLE),
    );
    let state = AppState::new(CatalogGateway::new(cors, Some(dispatcher)));
    TestApp {
        app: api::create_app(state),
        objects,
        audit,
    }
}

/// Router whose gateway has no bucket configured
#[allow(dead_code)]
pub fn build_unconfigured_app() -> Router {
    api::create_app(AppState::new(CatalogGateway::new(CorsPolicy::Wildcard, None)))
}

/// Response captured from a oneshot call
#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub raw_body: String,
}

#[allow(dead_code)]
impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.raw_body).expect("response body is not JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: Method,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<String>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(path);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder
        .body(body.map(Body::from).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        headers,
        raw_body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

#[allow(dead_code)]
pub async fn post_json(app: &Router, path: &str, body: &Value) -> TestResponse {
    send(
        app,
        Method::POST,
        path,
        &[("content-type", "application/json")],
        Some(body.to_string()),
    )
    .await
}
