//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::http::header::{CACHE_CONTROL, SET_COOKIE};
use common::{body_json, get, send, BROWSER_A};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_offline_app();
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_offline_app();
    let response = get(app, "/api/v1/auth/fingerprint").await;

    assert_eq!(response.status(), StatusCode::OK);
    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

/// Preflight from the configured origin allows credentials so the session
/// cookie is sent cross-origin.
#[tokio::test]
async fn cors_preflight_allows_credentials() {
    let app = common::build_offline_app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/auth/session")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get("access-control-allow-credentials").unwrap(),
        "true"
    );
}

/// Session endpoints must never be cached; other routes are left alone.
#[tokio::test]
async fn auth_responses_are_not_cacheable() {
    let response = send(
        common::build_offline_app(),
        Method::GET,
        "/api/v1/auth/fingerprint",
        BROWSER_A,
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(CACHE_CONTROL).unwrap(), "no-store");

    let response = get(common::build_offline_app(), "/this-route-does-not-exist").await;
    assert!(response.headers().get(CACHE_CONTROL).is_none());
}

/// `Set-Cookie` leaves the stack flagged sensitive so tracing redacts it.
#[tokio::test]
async fn set_cookie_is_marked_sensitive() {
    let response = send(
        common::build_offline_app(),
        Method::POST,
        "/api/v1/auth/logout",
        BROWSER_A,
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(CACHE_CONTROL).unwrap(), "no-store");
    let cookie = response.headers().get(SET_COOKIE).expect("cookie is cleared");
    assert!(cookie.is_sensitive());
}
