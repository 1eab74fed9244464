//! Contract Test: POST /catalog/write

use axum::http::{Method, StatusCode};
use catalog_gateway::api::catalog::MAX_BODY_BYTES;
use catalog_gateway::audit::MemoryAuditLogStore;
use catalog_gateway::common::types::ActionLabel;
use catalog_gateway::cors::CorsPolicy;
use catalog_gateway::storage::MemoryObjectStore;
use serde_json::json;

use crate::support::stores::{build_app, build_app_with, post_json, send, BUCKET};

const WRITE: &str = "/catalog/write";

#[tokio::test]
async fn write_project_document_returns_ok_and_audits() {
    let t = build_app(CorsPolicy::Wildcard);

    let response = send(
        &t.app,
        Method::POST,
        WRITE,
        &[
            ("Origin", "https://app.example.com"),
            ("X-User-Sub", "user-123"),
            ("X-User-Email", "editor@example.com"),
        ],
        Some(json!({ "key": "catalog/v1/projects/1/index.json", "body": { "name": "A" } }).to_string()),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "ok": true, "key": "catalog/v1/projects/1/index.json", "bucket": BUCKET })
    );
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(
        response.header("access-control-allow-origin"),
        Some("https://app.example.com")
    );

    let object = t.objects.get(BUCKET, "catalog/v1/projects/1/index.json").unwrap();
    assert_eq!(object.body, br#"{"name":"A"}"#.to_vec());
    assert_eq!(object.cache_control, "no-cache");

    let items = t.audit.items();
    assert_eq!(items.len(), 1);
    let event = &items[0].1;
    assert_eq!(event.action, ActionLabel::ProjectSave);
    assert_eq!(event.user_id, "user-123");
    assert_eq!(event.user_email, "editor@example.com");
    assert_eq!(event.target, "catalog/v1/projects/1/index.json");
    assert_eq!(
        event.details,
        Some(json!({
            "key": "catalog/v1/projects/1/index.json",
            "contentType": "application/json; charset=utf-8",
        }))
    );
}

#[tokio::test]
async fn write_keeps_non_ascii_and_custom_content_type() {
    let t = build_app(CorsPolicy::Wildcard);

    let response = post_json(
        &t.app,
        WRITE,
        &json!({
            "key": "catalog/v1/areas.json",
            "body": [{ "name": "北エリア" }],
            "contentType": "application/vnd.catalog+json",
        }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let object = t.objects.get(BUCKET, "catalog/v1/areas.json").unwrap();
    assert_eq!(String::from_utf8(object.body).unwrap(), r#"[{"name":"北エリア"}]"#);
    assert_eq!(object.content_type, "application/vnd.catalog+json");
    assert_eq!(t.audit.items()[0].1.action, ActionLabel::AreasUpdate);
}

#[tokio::test]
async fn write_missing_fields_is_bad_request() {
    let t = build_app(CorsPolicy::Wildcard);

    for payload in [
        json!({ "body": {} }),
        json!({ "key": "catalog/v1/a.json" }),
        json!({ "key": "catalog/v1/a.json", "body": null }),
        json!({ "key": "", "body": {} }),
        json!({}),
    ] {
        let response = post_json(&t.app, WRITE, &payload).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(response.json(), json!({ "error": "key and body are required" }));
    }
    assert_eq!(t.objects.put_calls(), 0);
}

#[tokio::test]
async fn write_invalid_json_is_bad_request() {
    let t = build_app(CorsPolicy::Wildcard);

    let response = send(&t.app, Method::POST, WRITE, &[], Some("{not json".to_string())).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let error = response.json()["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("invalid json: "), "{error}");
}

#[tokio::test]
async fn write_outside_namespace_is_forbidden_without_store_call() {
    let t = build_app(CorsPolicy::Wildcard);

    for key in ["catalog/v2/x.json", "private/secrets.json", "Catalog/v1/x.json"] {
        let response = post_json(&t.app, WRITE, &json!({ "key": key, "body": {} })).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{key}");
        assert_eq!(response.json(), json!({ "error": "key must start with catalog/v1/" }));
    }
    assert_eq!(t.objects.put_calls(), 0);
    assert!(t.audit.items().is_empty());
}

#[tokio::test]
async fn write_store_failure_is_500_and_not_audited() {
    let objects = MemoryObjectStore::new();
    objects.fail_all();
    let t = build_app_with(CorsPolicy::Wildcard, objects, MemoryAuditLogStore::new());

    let response = post_json(
        &t.app,
        WRITE,
        &json!({ "key": "catalog/v1/projects.json", "body": [] }),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.json()["error"]
        .as_str()
        .unwrap()
        .contains("injected failure"));
    assert_eq!(t.audit.put_calls(), 0);
}

#[tokio::test]
async fn write_is_idempotent() {
    let t = build_app(CorsPolicy::Wildcard);
    let payload = json!({ "key": "catalog/v1/areas/a1/index.json", "body": { "uuid": "a1" } });

    let first = post_json(&t.app, WRITE, &payload).await;
    let second = post_json(&t.app, WRITE, &payload).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.raw_body, second.raw_body);
    assert_eq!(t.objects.len(), 1);
    let actions: Vec<ActionLabel> = t.audit.items().into_iter().map(|(_, e)| e.action).collect();
    assert_eq!(actions, vec![ActionLabel::AreaUpdate, ActionLabel::AreaUpdate]);
}

#[tokio::test]
async fn write_succeeds_when_audit_store_fails() {
    let t = build_app_with(
        CorsPolicy::Wildcard,
        MemoryObjectStore::new(),
        MemoryAuditLogStore::failing(),
    );

    let response = post_json(
        &t.app,
        WRITE,
        &json!({ "key": "catalog/v1/projects.json", "body": [] }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["ok"], true);
    assert_eq!(t.audit.put_calls(), 1);
    assert!(t.objects.get(BUCKET, "catalog/v1/projects.json").is_some());
}

#[tokio::test]
async fn write_stores_body_byte_exact() {
    let t = build_app(CorsPolicy::Wildcard);
    let document =
        r#"{"zeta":1,"alpha":2,"id":12345678901234567890123,"price":0.1000000000000000055511151231257827}"#;

    let response = send(
        &t.app,
        Method::POST,
        WRITE,
        &[],
        Some(format!(r#"{{"key":"catalog/v1/projects.json","body":{document}}}"#)),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let object = t.objects.get(BUCKET, "catalog/v1/projects.json").unwrap();
    assert_eq!(String::from_utf8(object.body).unwrap(), document);
}

#[tokio::test]
async fn write_oversized_body_is_rejected_with_cors_headers() {
    let t = build_app(CorsPolicy::Wildcard);
    let oversized = "a".repeat(MAX_BODY_BYTES + 1024 * 1024);

    let response = send(
        &t.app,
        Method::POST,
        WRITE,
        &[("Origin", "https://app.example.com")],
        Some(oversized),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["error"]
        .as_str()
        .unwrap()
        .starts_with("failed to read request body"));
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(
        response.header("access-control-allow-origin"),
        Some("https://app.example.com")
    );
    assert!(response.header("access-control-allow-headers").is_some());
    assert!(response.header("access-control-allow-methods").is_some());
    assert_eq!(t.objects.put_calls(), 0);
}
