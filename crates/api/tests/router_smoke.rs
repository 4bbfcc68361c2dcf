//! Router-level smoke tests that run without a database.
//!
//! These exercise routing, auth gating, and the middleware stack with a lazy
//! connection pool; no request here ever reaches PostgreSQL.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use brainswarm_api::app::create_app;

fn test_app() -> axum::Router {
    let config = common::test_config();
    let pool = common::lazy_pool(&config);
    create_app(config, pool)
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

#[tokio::test]
async fn test_liveness_does_not_touch_database() {
    let app = test_app();
    let response = app
        .oneshot(empty_request(Method::GET, "/api/health/live"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_protected_routes_require_bearer_token() {
    let team = uuid::Uuid::new_v4();
    let paths = [
        (Method::POST, "/api/v1/teams".to_string()),
        (Method::GET, format!("/api/v1/teams/{}", team)),
        (Method::GET, format!("/api/v1/teams/{}/entries", team)),
        (Method::GET, format!("/api/v1/teams/{}/entries/export", team)),
        (Method::GET, format!("/api/v1/teams/{}/members", team)),
    ];

    for (method, path) in paths {
        let app = test_app();
        let response = app.oneshot(empty_request(method, &path)).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "expected 401 for {}",
            path
        );
        let body = body_json(response).await;
        assert_eq!(body["error"], "unauthorized");
    }
}

#[tokio::test]
async fn test_garbage_bearer_token_is_rejected() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/teams/00000000-0000-0000-0000-000000000000")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = test_app();
    let response = app
        .oneshot(empty_request(Method::GET, "/api/health/live"))
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_incoming_request_id_is_echoed() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/health/live")
        .header("X-Request-ID", "trace-me-42")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "trace-me-42");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = test_app();
    let response = app
        .oneshot(empty_request(Method::GET, "/api/v1/nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
