//! Contract Test: CORS preflight, method filtering and health check

use axum::http::{Method, StatusCode};
use catalog_gateway::cors::CorsPolicy;
use serde_json::json;

use crate::support::stores::{build_app, build_unconfigured_app, post_json, send};

#[tokio::test]
async fn options_returns_204_on_both_routes() {
    let t = build_app(CorsPolicy::Wildcard);

    for path in ["/catalog/write", "/catalog/delete"] {
        let response = send(
            &t.app,
            Method::OPTIONS,
            path,
            &[("Origin", "https://app.example.com")],
            None,
        )
        .await;

        assert_eq!(response.status, StatusCode::NO_CONTENT, "{path}");
        assert_eq!(response.raw_body, "");
        assert_eq!(
            response.header("access-control-allow-origin"),
            Some("https://app.example.com")
        );
        assert_eq!(
            response.header("access-control-allow-headers"),
            Some("Content-Type, X-User-Sub, X-User-Email")
        );
        assert_eq!(response.header("access-control-allow-methods"), Some("POST, OPTIONS"));
    }
    assert_eq!(t.objects.put_calls() + t.objects.delete_calls(), 0);
}

#[tokio::test]
async fn options_is_answered_even_without_bucket() {
    let app = build_unconfigured_app();

    let response = send(&app, Method::OPTIONS, "/catalog/write", &[], None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(response.header("access-control-allow-origin"), Some("*"));

    let response = post_json(&app, "/catalog/delete", &json!({ "key": "catalog/v1/a" })).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json(), json!({ "error": "BUCKET_NAME is not set" }));
}

#[tokio::test]
async fn allow_list_echoes_listed_origin_and_falls_back_to_first() {
    let t = build_app(CorsPolicy::parse(
        "https://admin.example.com, https://app.example.com",
    ));

    let listed = send(
        &t.app,
        Method::OPTIONS,
        "/catalog/write",
        &[("Origin", "https://app.example.com")],
        None,
    )
    .await;
    assert_eq!(
        listed.header("access-control-allow-origin"),
        Some("https://app.example.com")
    );

    let unlisted = send(
        &t.app,
        Method::OPTIONS,
        "/catalog/write",
        &[("Origin", "https://evil.example.net")],
        None,
    )
    .await;
    assert_eq!(
        unlisted.header("access-control-allow-origin"),
        Some("https://admin.example.com")
    );
}

#[tokio::test]
async fn other_methods_are_405_with_cors_headers() {
    let t = build_app(CorsPolicy::Wildcard);

    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let response = send(
            &t.app,
            method.clone(),
            "/catalog/delete",
            &[("Origin", "https://app.example.com")],
            None,
        )
        .await;
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(response.json(), json!({ "error": "method not allowed" }));
        assert_eq!(
            response.header("access-control-allow-origin"),
            Some("https://app.example.com")
        );
    }
    assert_eq!(t.objects.delete_calls(), 0);
}

#[tokio::test]
async fn healthz_reports_ok() {
    let t = build_app(CorsPolicy::Wildcard);
    let response = send(&t.app, Method::GET, "/healthz", &[], None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({ "status": "ok" }));
}
