//! Integration Test: HTTP object store against a mock S3-style endpoint

use catalog_gateway::audit::{AuditLogger, MemoryAuditLogStore};
use catalog_gateway::common::error::StoreError;
use catalog_gateway::common::protocol::InvocationEnvelope;
use catalog_gateway::common::types::MutationKind;
use catalog_gateway::cors::CorsPolicy;
use catalog_gateway::dispatcher::MutationDispatcher;
use catalog_gateway::gateway::CatalogGateway;
use catalog_gateway::storage::{HttpObjectStore, ObjectStore};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn put_sends_content_type_and_cache_control() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/catalog-bucket/catalog/v1/projects/1/index.json"))
        .and(header("content-type", "application/json; charset=utf-8"))
        .and(header("cache-control", "no-cache"))
        .and(body_string(r#"{"name":"A"}"#))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = HttpObjectStore::new(&server.uri()).unwrap();
    store
        .put_object(
            "catalog-bucket",
            "catalog/v1/projects/1/index.json",
            br#"{"name":"A"}"#.to_vec(),
            "application/json; charset=utf-8",
            "no-cache",
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_treats_missing_object_as_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/catalog-bucket/catalog/v1/areas.json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let store = HttpObjectStore::new(&server.uri()).unwrap();
    store
        .delete_object("catalog-bucket", "catalog/v1/areas.json")
        .await
        .unwrap();
}

#[tokio::test]
async fn server_error_becomes_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(503).set_body_string("SlowDown"))
        .mount(&server)
        .await;

    let store = HttpObjectStore::new(&server.uri()).unwrap();
    let err = store
        .put_object("b", "catalog/v1/a.json", b"{}".to_vec(), "application/json", "no-cache")
        .await
        .unwrap_err();

    match err {
        StoreError::Rejected { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "SlowDown");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn gateway_delete_over_http_aggregates_failures() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/catalog-bucket/catalog/v1/projects/1/index.json"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/catalog-bucket/catalog/v1/projects/2/index.json"))
        .respond_with(ResponseTemplate::new(403).set_body_string("AccessDenied"))
        .mount(&server)
        .await;

    let audit = MemoryAuditLogStore::new();
    let gateway = CatalogGateway::new(
        CorsPolicy::Wildcard,
        Some(MutationDispatcher::new(
            Arc::new(HttpObjectStore::new(&server.uri()).unwrap()),
            "catalog-bucket",
            AuditLogger::new(Arc::new(audit.clone()), "audit"),
        )),
    );

    let envelope = InvocationEnvelope::new(
        "POST",
        Some(
            json!({ "keys": ["catalog/v1/projects/1/index.json", "catalog/v1/projects/2/index.json"] })
                .to_string(),
        ),
    );
    let response = gateway.handle(MutationKind::Delete, &envelope).await;

    assert_eq!(response.status_code, 200);
    let body = response.json();
    assert_eq!(body["ok"], false);
    assert_eq!(body["deleted"], json!(["catalog/v1/projects/1/index.json"]));
    assert_eq!(body["errors"][0]["key"], "catalog/v1/projects/2/index.json");
    assert_eq!(
        body["errors"][0]["error"],
        "store rejected request (403): AccessDenied"
    );
    assert_eq!(audit.items().len(), 1);
}
