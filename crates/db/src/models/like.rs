//! User like model and DTOs.

use amora_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_likes` table: `from_user_id` liked `to_user_id`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserLike {
    pub id: DbId,
    pub from_user_id: DbId,
    pub to_user_id: DbId,
    pub created_at: Timestamp,
}

/// Another user as seen from one side of a like.
///
/// `liked_at` is when that user liked the viewer.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LikedUser {
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_activity: Timestamp,
    pub liked_at: Timestamp,
}

/// Per-user like counters for `GET /users/{id}/likes/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct LikeStats {
    pub likes_sent: i64,
    pub likes_received: i64,
    pub mutual_likes: i64,
    pub potential_matches: i64,
}
