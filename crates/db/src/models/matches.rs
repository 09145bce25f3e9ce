//! Match model and DTOs.

use amora_core::error::CoreError;
use amora_core::matching::MatchStatus;
use amora_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `matches` table. The pair is stored ordered
/// (`user1_id < user2_id`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Match {
    pub id: DbId,
    pub user1_id: DbId,
    pub user2_id: DbId,
    pub match_status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Match {
    pub fn status(&self) -> Result<MatchStatus, CoreError> {
        MatchStatus::from_str_value(&self.match_status)
    }

    pub fn involves(&self, user_id: DbId) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }
}

/// A match listed for one of its users, with the other side resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserMatch {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub matched: Match,
    pub matched_user_id: DbId,
    pub matched_user_name: String,
}

/// Global match counters by status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MatchCounts {
    pub total: i64,
    pub active: i64,
    pub paused: i64,
    pub ended: i64,
}

/// Match counters for a single user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserMatchStats {
    pub total_matches: i64,
    pub active_matches: i64,
    pub paused_matches: i64,
    pub ended_matches: i64,
    pub first_match_at: Option<Timestamp>,
    pub last_match_at: Option<Timestamp>,
}
