//! Repository for the `user_sessions` table.

use amora_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::session::{CreateSession, UserSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, fingerprint_hash, jwt_token_hash, expires_at, \
                        ip_address, is_active, created_at, updated_at";

/// Provides CRUD operations for user sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new active session, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (user_id, fingerprint_hash, jwt_token_hash, expires_at, ip_address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.fingerprint_hash)
            .bind(&input.jwt_token_hash)
            .bind(input.expires_at)
            .bind(&input.ip_address)
            .fetch_one(pool)
            .await
    }

    /// Find a session by ID regardless of its state.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_sessions WHERE id = $1");
        sqlx::query_as::<_, UserSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a session by its current token hash regardless of its state.
    pub async fn find_by_token_hash(
        pool: &PgPool,
        hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_sessions WHERE jwt_token_hash = $1");
        sqlx::query_as::<_, UserSession>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Most recent active session carrying the given fingerprint hash.
    pub async fn find_latest_active_by_fingerprint(
        pool: &PgPool,
        fingerprint_hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE fingerprint_hash = $1 AND is_active = true
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(fingerprint_hash)
            .fetch_optional(pool)
            .await
    }

    /// List all sessions, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<UserSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_sessions ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, UserSession>(&query).fetch_all(pool).await
    }

    /// List every session of a user, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List a user's sessions that are active and not yet expired.
    pub async fn list_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE user_id = $1 AND is_active = true AND expires_at > NOW()
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List sessions created from the given client IP, newest first.
    pub async fn list_by_ip(
        pool: &PgPool,
        ip_address: &str,
    ) -> Result<Vec<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE ip_address = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(ip_address)
            .fetch_all(pool)
            .await
    }

    /// Count a user's active, unexpired sessions.
    pub async fn count_active_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM user_sessions
             WHERE user_id = $1 AND is_active = true AND expires_at > NOW()",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Replace the stored token hash and expiry. Returns `true` if the row exists.
    pub async fn rotate_token(
        pool: &PgPool,
        id: DbId,
        jwt_token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET jwt_token_hash = $2, expires_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(jwt_token_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move a session's expiry, returning the updated row.
    pub async fn extend(
        pool: &PgPool,
        id: DbId,
        expires_at: Timestamp,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "UPDATE user_sessions SET expires_at = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(id)
            .bind(expires_at)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate a single session. Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deactivate all active sessions for a user. Returns the count of deactivated sessions.
    pub async fn deactivate_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_active = false
             WHERE user_id = $1 AND is_active = true",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Deactivate every active session of a user except `keep_id`.
    pub async fn deactivate_all_for_user_except(
        pool: &PgPool,
        user_id: DbId,
        keep_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_active = false
             WHERE user_id = $1 AND id <> $2 AND is_active = true",
        )
        .bind(user_id)
        .bind(keep_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Hard-delete a session. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete sessions whose expiry has passed. Returns the count of deleted rows.
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE expires_at < NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
