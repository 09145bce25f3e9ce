//! Integration tests for the `users` and `user_sessions` repositories.
//!
//! Exercises the repository layer against a real database:
//! - Token rotation and lookup by hash
//! - Fingerprint reuse lookups
//! - Deactivation scopes (single, all, all-but-one)
//! - Expiry sweep
//! - Unique constraints and cascade delete

use amora_db::models::session::CreateSession;
use amora_db::models::user::{CreateUser, UpdateUser};
use amora_db::repositories::{SessionRepo, UserRepo};
use chrono::{Duration, Utc};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str) -> i64 {
    let input = CreateUser {
        email: email.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        first_name: "Test".to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
        .id
}

fn new_session(user_id: i64, fingerprint: &str, token_hash: &str, days: i64) -> CreateSession {
    CreateSession {
        user_id,
        fingerprint_hash: fingerprint.to_string(),
        jwt_token_hash: token_hash.to_string(),
        expires_at: Utc::now() + Duration::days(days),
        ip_address: Some("10.0.0.1".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_rotate_token(pool: PgPool) {
    let user_id = new_user(&pool, "rotate@test.com").await;
    let session = SessionRepo::create(&pool, &new_session(user_id, "fp", "pending-1", 30))
        .await
        .unwrap();
    assert!(session.is_active);
    assert_eq!(session.jwt_token_hash, "pending-1");

    let new_expiry = Utc::now() + Duration::days(60);
    let rotated = SessionRepo::rotate_token(&pool, session.id, "real-hash", new_expiry)
        .await
        .unwrap();
    assert!(rotated);

    let found = SessionRepo::find_by_token_hash(&pool, "real-hash")
        .await
        .unwrap()
        .expect("session should be found by its new hash");
    assert_eq!(found.id, session.id);
    assert!(found.expires_at > session.expires_at);

    assert!(SessionRepo::find_by_token_hash(&pool, "pending-1")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_token_hash_rejected(pool: PgPool) {
    let user_id = new_user(&pool, "dup@test.com").await;
    SessionRepo::create(&pool, &new_session(user_id, "fp", "same", 30))
        .await
        .unwrap();
    let err = SessionRepo::create(&pool, &new_session(user_id, "fp", "same", 30))
        .await
        .expect_err("duplicate token hash must violate the unique constraint");
    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_latest_active_by_fingerprint(pool: PgPool) {
    let first = new_user(&pool, "first@test.com").await;
    let second = new_user(&pool, "second@test.com").await;

    let old = SessionRepo::create(&pool, &new_session(first, "shared", "h1", 30))
        .await
        .unwrap();
    let newer = SessionRepo::create(&pool, &new_session(second, "shared", "h2", 30))
        .await
        .unwrap();

    let found = SessionRepo::find_latest_active_by_fingerprint(&pool, "shared")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, newer.id);

    SessionRepo::deactivate(&pool, newer.id).await.unwrap();
    let found = SessionRepo::find_latest_active_by_fingerprint(&pool, "shared")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, old.id);

    assert!(SessionRepo::find_latest_active_by_fingerprint(&pool, "other")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivate_scopes(pool: PgPool) {
    let user_id = new_user(&pool, "scopes@test.com").await;
    let a = SessionRepo::create(&pool, &new_session(user_id, "fp", "a", 30))
        .await
        .unwrap();
    SessionRepo::create(&pool, &new_session(user_id, "fp", "b", 30))
        .await
        .unwrap();
    SessionRepo::create(&pool, &new_session(user_id, "fp", "c", 30))
        .await
        .unwrap();

    let count = SessionRepo::deactivate_all_for_user_except(&pool, user_id, a.id)
        .await
        .unwrap();
    assert_eq!(count, 2);
    assert_eq!(SessionRepo::count_active_for_user(&pool, user_id).await.unwrap(), 1);

    // Deactivating twice is a no-op.
    assert!(SessionRepo::deactivate(&pool, a.id).await.unwrap());
    assert!(!SessionRepo::deactivate(&pool, a.id).await.unwrap());

    assert_eq!(SessionRepo::deactivate_all_for_user(&pool, user_id).await.unwrap(), 0);
    assert!(SessionRepo::list_active_for_user(&pool, user_id)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(SessionRepo::list_for_user(&pool, user_id).await.unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_expired(pool: PgPool) {
    let user_id = new_user(&pool, "expired@test.com").await;
    SessionRepo::create(&pool, &new_session(user_id, "fp", "live", 30))
        .await
        .unwrap();
    SessionRepo::create(&pool, &new_session(user_id, "fp", "dead", -1))
        .await
        .unwrap();

    let deleted = SessionRepo::delete_expired(&pool).await.unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(SessionRepo::list(&pool).await.unwrap().len(), 1);
    assert_eq!(SessionRepo::list_by_ip(&pool, "10.0.0.1").await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_update_and_cascade_delete(pool: PgPool) {
    let user_id = new_user(&pool, "cascade@test.com").await;
    let session = SessionRepo::create(&pool, &new_session(user_id, "fp", "x", 30))
        .await
        .unwrap();

    let updated = UserRepo::update(
        &pool,
        user_id,
        &UpdateUser {
            first_name: Some("Renamed".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.first_name, "Renamed");
    assert_eq!(updated.email, "cascade@test.com");

    assert!(UserRepo::touch_activity(&pool, user_id).await.unwrap());
    assert_eq!(
        UserRepo::count_active_since(&pool, Utc::now() - Duration::days(30))
            .await
            .unwrap(),
        1
    );

    assert!(UserRepo::delete(&pool, user_id).await.unwrap());
    assert!(SessionRepo::find_by_id(&pool, session.id).await.unwrap().is_none());
    assert!(UserRepo::find_by_id(&pool, user_id).await.unwrap().is_none());
}
