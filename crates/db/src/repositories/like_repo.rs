//! Repository for the `user_likes` table.

use amora_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::like::{LikedUser, UserLike};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, from_user_id, to_user_id, created_at";

/// Provides CRUD operations and mutual-like queries for user likes.
pub struct LikeRepo;

impl LikeRepo {
    /// Insert a like, returning the created row.
    pub async fn create(
        pool: &PgPool,
        from_user_id: DbId,
        to_user_id: DbId,
    ) -> Result<UserLike, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_likes (from_user_id, to_user_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserLike>(&query)
            .bind(from_user_id)
            .bind(to_user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UserLike>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_likes WHERE id = $1");
        sqlx::query_as::<_, UserLike>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether `from_user_id` already likes `to_user_id`.
    pub async fn exists(
        pool: &PgPool,
        from_user_id: DbId,
        to_user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                 SELECT 1 FROM user_likes WHERE from_user_id = $1 AND to_user_id = $2
             )",
        )
        .bind(from_user_id)
        .bind(to_user_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// List all likes, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<UserLike>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_likes ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, UserLike>(&query).fetch_all(pool).await
    }

    /// List likes created at or after `since`, newest first.
    pub async fn list_since(pool: &PgPool, since: Timestamp) -> Result<Vec<UserLike>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_likes
             WHERE created_at >= $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, UserLike>(&query)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    /// Likes given by a user, newest first.
    pub async fn list_from_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserLike>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_likes
             WHERE from_user_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, UserLike>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Likes received by a user, newest first.
    pub async fn list_to_user(pool: &PgPool, user_id: DbId) -> Result<Vec<UserLike>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_likes
             WHERE to_user_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, UserLike>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Whether the two users like each other.
    pub async fn is_mutual(pool: &PgPool, a: DbId, b: DbId) -> Result<bool, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM user_likes
             WHERE (from_user_id = $1 AND to_user_id = $2)
                OR (from_user_id = $2 AND to_user_id = $1)",
        )
        .bind(a)
        .bind(b)
        .fetch_one(pool)
        .await?;
        Ok(row.0 == 2)
    }

    /// Users who like `user_id` and are liked back.
    pub async fn list_mutual(pool: &PgPool, user_id: DbId) -> Result<Vec<LikedUser>, sqlx::Error> {
        sqlx::query_as::<_, LikedUser>(
            "SELECT u.id, u.email, u.first_name, u.last_activity, theirs.created_at AS liked_at
             FROM user_likes mine
             JOIN user_likes theirs
               ON theirs.from_user_id = mine.to_user_id AND theirs.to_user_id = mine.from_user_id
             JOIN users u ON u.id = mine.to_user_id
             WHERE mine.from_user_id = $1
             ORDER BY theirs.created_at DESC, u.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Users who like `user_id` but have not been liked back, newest like first.
    pub async fn list_potential(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<LikedUser>, sqlx::Error> {
        sqlx::query_as::<_, LikedUser>(
            "SELECT u.id, u.email, u.first_name, u.last_activity, theirs.created_at AS liked_at
             FROM user_likes theirs
             JOIN users u ON u.id = theirs.from_user_id
             LEFT JOIN user_likes mine
               ON mine.from_user_id = theirs.to_user_id AND mine.to_user_id = theirs.from_user_id
             WHERE theirs.to_user_id = $1 AND mine.id IS NULL
             ORDER BY theirs.created_at DESC, u.id DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn count_from_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_likes WHERE from_user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    pub async fn count_to_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_likes WHERE to_user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Hard-delete a like. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_likes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove the like from `from_user_id` to `to_user_id`. Returns `true` if it existed.
    pub async fn delete_between(
        pool: &PgPool,
        from_user_id: DbId,
        to_user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM user_likes WHERE from_user_id = $1 AND to_user_id = $2")
                .bind(from_user_id)
                .bind(to_user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
