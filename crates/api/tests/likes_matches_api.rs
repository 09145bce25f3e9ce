//! HTTP-level integration tests for the `/likes` and `/matches` routes.

mod common;

use amora_db::repositories::MatchRepo;
use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use common::{body_json, establish, send, Browser, BROWSER_A, BROWSER_B};
use serde_json::{json, Value};
use sqlx::PgPool;

/// A signed-in guest: browser, cookie and user id.
struct Guest {
    browser: Browser,
    token: String,
    user_id: i64,
}

async fn guest(app: axum::Router, browser: Browser) -> Guest {
    let (token, body) = establish(app, browser).await;
    Guest {
        browser,
        token,
        user_id: body["data"]["user_id"].as_i64().unwrap(),
    }
}

async fn call(
    app: &axum::Router,
    who: &Guest,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = send(app.clone(), method, uri, who.browser, Some(&who.token), body).await;
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return (status, Value::Null);
    }
    (status, body_json(response).await)
}

async fn like(app: &axum::Router, from: &Guest, to: i64) -> (StatusCode, Value) {
    call(app, from, Method::POST, "/api/v1/likes", Some(json!({ "to_user_id": to }))).await
}

// ---------------------------------------------------------------------------
// Likes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_like_validation(pool: PgPool) {
    let app = common::build_test_app(pool);
    let ana = guest(app.clone(), BROWSER_A).await;
    let ben = guest(app.clone(), BROWSER_B).await;

    let (status, json) = like(&app, &ana, ana.user_id).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "User cannot like themselves");

    let (status, _) = like(&app, &ana, 999_999).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = like(&app, &ana, ben.user_id).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["like"]["from_user_id"], ana.user_id);
    assert_eq!(json["data"]["like"]["to_user_id"], ben.user_id);
    assert!(json["data"]["match"].is_null());

    let (status, json) = like(&app, &ana, ben.user_id).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        format!("Like from user {} to user {} already exists", ana.user_id, ben.user_id)
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_like_listings_and_unlike(pool: PgPool) {
    let app = common::build_test_app(pool);
    let ana = guest(app.clone(), BROWSER_A).await;
    let ben = guest(app.clone(), BROWSER_B).await;
    like(&app, &ana, ben.user_id).await;

    let uri = format!("/api/v1/users/{}/likes/potential", ben.user_id);
    let (status, json) = call(&app, &ben, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["id"], ana.user_id);

    let uri = format!("/api/v1/users/{}/likes/stats", ben.user_id);
    let (_, json) = call(&app, &ben, Method::GET, &uri, None).await;
    assert_eq!(json["data"]["likes_received"], 1);
    assert_eq!(json["data"]["likes_sent"], 0);
    assert_eq!(json["data"]["potential_matches"], 1);

    let (_, json) = call(&app, &ana, Method::GET, "/api/v1/likes/recent", None).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    let (status, _) = call(&app, &ana, Method::GET, "/api/v1/likes/recent?hours=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/api/v1/likes/to/{}", ben.user_id);
    let (status, _) = call(&app, &ana, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, &ana, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/api/v1/users/{}/likes/sent", ana.user_id);
    let (_, json) = call(&app, &ana, Method::GET, &uri, None).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Mutual like -> match
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mutual_like_creates_match(pool: PgPool) {
    let app = common::build_test_app(pool);
    let ana = guest(app.clone(), BROWSER_A).await;
    let ben = guest(app.clone(), BROWSER_B).await;

    let (_, json) = like(&app, &ana, ben.user_id).await;
    assert!(json["data"]["match"].is_null());

    let (status, json) = like(&app, &ben, ana.user_id).await;
    assert_eq!(status, StatusCode::CREATED);
    let matched = &json["data"]["match"];
    assert_eq!(matched["match_status"], "active");
    assert_eq!(matched["user1_id"], ana.user_id.min(ben.user_id));
    assert_eq!(matched["user2_id"], ana.user_id.max(ben.user_id));
    let match_id = matched["id"].as_i64().unwrap();

    // Asking again returns the same match rather than a second one.
    let (status, json) = call(
        &app,
        &ana,
        Method::POST,
        "/api/v1/matches/from-likes",
        Some(json!({ "user_id": ben.user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["is_mutual"], true);
    assert_eq!(json["data"]["match"]["id"], match_id);

    let uri = format!("/api/v1/users/{}/matches", ana.user_id);
    let (_, json) = call(&app, &ana, Method::GET, &uri, None).await;
    let list = json["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], match_id);
    assert_eq!(list[0]["matched_user_id"], ben.user_id);
    assert_eq!(list[0]["matched_user_name"], "Guest");

    let uri = format!("/api/v1/users/{}/likes/mutual", ben.user_id);
    let (_, json) = call(&app, &ben, Method::GET, &uri, None).await;
    assert_eq!(json["data"][0]["id"], ana.user_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_from_likes_without_mutual_like(pool: PgPool) {
    let app = common::build_test_app(pool);
    let ana = guest(app.clone(), BROWSER_A).await;
    let ben = guest(app.clone(), BROWSER_B).await;
    like(&app, &ana, ben.user_id).await;

    let (status, json) = call(
        &app,
        &ana,
        Method::POST,
        "/api/v1/matches/from-likes",
        Some(json!({ "user_id": ben.user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["is_mutual"], false);
    assert!(json["data"]["match"].is_null());

    let (_, json) = call(&app, &ana, Method::GET, "/api/v1/matches", None).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_match_status_transitions(pool: PgPool) {
    let app = common::build_test_app(pool);
    let ana = guest(app.clone(), BROWSER_A).await;
    let ben = guest(app.clone(), BROWSER_B).await;
    like(&app, &ana, ben.user_id).await;
    let (_, json) = like(&app, &ben, ana.user_id).await;
    let match_id = json["data"]["match"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/matches/{match_id}/status");

    for (status, expected) in [("paused", "paused"), ("ACTIVE", "active"), ("ended", "ended")] {
        let (code, json) = call(&app, &ana, Method::PATCH, &uri, Some(json!({ "status": status }))).await;
        assert_eq!(code, StatusCode::OK, "-> {status}");
        assert_eq!(json["data"]["match_status"], expected);
    }

    // Ended is final.
    let (code, json) = call(&app, &ana, Method::PATCH, &uri, Some(json!({ "status": "active" }))).await;
    assert_eq!(code, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");

    let (code, json) = call(&app, &ana, Method::PATCH, &uri, Some(json!({ "status": "archived" }))).await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let (code, _) = call(
        &app,
        &ana,
        Method::PATCH,
        "/api/v1/matches/999999/status",
        Some(json!({ "status": "paused" })),
    )
    .await;
    assert_eq!(code, StatusCode::NOT_FOUND);

    let uri = format!("/api/v1/users/{}/matches?status=ended", ana.user_id);
    let (_, json) = call(&app, &ana, Method::GET, &uri, None).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    let uri = format!("/api/v1/users/{}/matches?status=active", ana.user_id);
    let (_, json) = call(&app, &ana, Method::GET, &uri, None).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    let (_, json) = call(&app, &ana, Method::GET, "/api/v1/matches/stats", None).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["ended"], 1);

    // Liking again after withdrawing does not reopen the ended match.
    let withdraw = format!("/api/v1/likes/to/{}", ana.user_id);
    call(&app, &ben, Method::DELETE, &withdraw, None).await;
    let (_, json) = like(&app, &ben, ana.user_id).await;
    assert_eq!(json["data"]["match"]["id"], match_id);
    assert_eq!(json["data"]["match"]["match_status"], "ended");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_end_inactive_matches(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let ana = guest(app.clone(), BROWSER_A).await;
    let ben = guest(app.clone(), BROWSER_B).await;
    like(&app, &ana, ben.user_id).await;
    let (_, json) = like(&app, &ben, ana.user_id).await;
    let match_id = json["data"]["match"]["id"].as_i64().unwrap();

    // Nothing is stale yet.
    let (status, json) = call(&app, &ana, Method::POST, "/api/v1/matches/end-inactive", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["ended_matches"], 0);
    assert_eq!(json["data"]["inactive_days"], 30);

    sqlx::query("ALTER TABLE matches DISABLE TRIGGER set_updated_at")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("UPDATE matches SET updated_at = $2 WHERE id = $1")
        .bind(match_id)
        .bind(Utc::now() - Duration::days(10))
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("ALTER TABLE matches ENABLE TRIGGER set_updated_at")
        .execute(&pool)
        .await
        .unwrap();

    let (status, json) = call(
        &app,
        &ana,
        Method::POST,
        "/api/v1/matches/end-inactive",
        Some(json!({ "days": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["ended_matches"], 1);
    assert_eq!(json["data"]["match_ids"][0], match_id);

    let stored = MatchRepo::find_by_id(&pool, match_id).await.unwrap().unwrap();
    assert_eq!(stored.match_status, "ended");

    let (status, _) = call(
        &app,
        &ana,
        Method::POST,
        "/api/v1/matches/end-inactive",
        Some(json!({ "days": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_match(pool: PgPool) {
    let app = common::build_test_app(pool);
    let ana = guest(app.clone(), BROWSER_A).await;
    let ben = guest(app.clone(), BROWSER_B).await;
    like(&app, &ana, ben.user_id).await;
    let (_, json) = like(&app, &ben, ana.user_id).await;
    let uri = format!("/api/v1/matches/{}", json["data"]["match"]["id"]);

    let (status, _) = call(&app, &ana, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, &ana, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
