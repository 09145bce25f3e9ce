//! Repository for the `matches` table.

use amora_core::matching::ordered_pair;
use amora_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::matches::{Match, MatchCounts, UserMatch, UserMatchStats};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user1_id, user2_id, match_status, created_at, updated_at";

/// Provides CRUD operations and status changes for matches.
pub struct MatchRepo;

impl MatchRepo {
    /// Insert an `active` match for the pair unless one already exists.
    ///
    /// Returns the match and whether this call created it. An existing match
    /// is returned unchanged, whatever its status.
    pub async fn create_for_pair(
        pool: &PgPool,
        a: DbId,
        b: DbId,
    ) -> Result<(Match, bool), sqlx::Error> {
        let (user1_id, user2_id) = ordered_pair(a, b);
        let query = format!(
            "INSERT INTO matches (user1_id, user2_id)
             VALUES ($1, $2)
             ON CONFLICT (user1_id, user2_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Match>(&query)
            .bind(user1_id)
            .bind(user2_id)
            .fetch_optional(pool)
            .await?;

        match inserted {
            Some(created) => Ok((created, true)),
            None => {
                let existing = Self::find_by_users(pool, a, b)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)?;
                Ok((existing, false))
            }
        }
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Match>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM matches WHERE id = $1");
        sqlx::query_as::<_, Match>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the match between two users, in either order.
    pub async fn find_by_users(
        pool: &PgPool,
        a: DbId,
        b: DbId,
    ) -> Result<Option<Match>, sqlx::Error> {
        let (user1_id, user2_id) = ordered_pair(a, b);
        let query = format!("SELECT {COLUMNS} FROM matches WHERE user1_id = $1 AND user2_id = $2");
        sqlx::query_as::<_, Match>(&query)
            .bind(user1_id)
            .bind(user2_id)
            .fetch_optional(pool)
            .await
    }

    /// List all matches, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Match>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM matches ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Match>(&query).fetch_all(pool).await
    }

    /// List matches created at or after `since`, newest first.
    pub async fn list_since(pool: &PgPool, since: Timestamp) -> Result<Vec<Match>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM matches
             WHERE created_at >= $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Match>(&query)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    /// A user's matches with the other side resolved, most recently changed first.
    ///
    /// `status` narrows the list to one status value.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<UserMatch>, sqlx::Error> {
        sqlx::query_as::<_, UserMatch>(
            "SELECT m.id, m.user1_id, m.user2_id, m.match_status, m.created_at, m.updated_at,
                    u.id AS matched_user_id, u.first_name AS matched_user_name
             FROM matches m
             JOIN users u
               ON u.id = CASE WHEN m.user1_id = $1 THEN m.user2_id ELSE m.user1_id END
             WHERE (m.user1_id = $1 OR m.user2_id = $1)
               AND ($2::TEXT IS NULL OR m.match_status = $2)
             ORDER BY m.updated_at DESC, m.id DESC",
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(pool)
        .await
    }

    /// Set a match's status, returning the updated row.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Match>, sqlx::Error> {
        let query =
            format!("UPDATE matches SET match_status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Match>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// End every active or paused match not updated since `older_than`.
    /// Returns the ids of the ended matches.
    pub async fn end_inactive(
        pool: &PgPool,
        older_than: Timestamp,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "UPDATE matches SET match_status = 'ended'
             WHERE match_status IN ('active', 'paused') AND updated_at < $1
             RETURNING id",
        )
        .bind(older_than)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Hard-delete a match. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count matches by status.
    pub async fn counts(pool: &PgPool) -> Result<MatchCounts, sqlx::Error> {
        sqlx::query_as::<_, MatchCounts>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE match_status = 'active') AS active,
                    COUNT(*) FILTER (WHERE match_status = 'paused') AS paused,
                    COUNT(*) FILTER (WHERE match_status = 'ended') AS ended
             FROM matches",
        )
        .fetch_one(pool)
        .await
    }

    /// Count one user's matches by status.
    pub async fn stats_for_user(pool: &PgPool, user_id: DbId) -> Result<UserMatchStats, sqlx::Error> {
        sqlx::query_as::<_, UserMatchStats>(
            "SELECT COUNT(*) AS total_matches,
                    COUNT(*) FILTER (WHERE match_status = 'active') AS active_matches,
                    COUNT(*) FILTER (WHERE match_status = 'paused') AS paused_matches,
                    COUNT(*) FILTER (WHERE match_status = 'ended') AS ended_matches,
                    MIN(created_at) AS first_match_at,
                    MAX(created_at) AS last_match_at
             FROM matches
             WHERE user1_id = $1 OR user2_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
