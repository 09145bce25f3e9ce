//! Likes and matches: status values, transition rules and request bounds.
//!
//! A match exists between two users once each has liked the other. Its
//! status moves between `active` and `paused` freely; `ended` is final.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Match status constants (values of `matches.match_status`)
// ---------------------------------------------------------------------------

pub const MATCH_STATUS_ACTIVE: &str = "active";
pub const MATCH_STATUS_PAUSED: &str = "paused";
pub const MATCH_STATUS_ENDED: &str = "ended";

/// All valid match status strings.
pub const VALID_MATCH_STATUSES: &[&str] =
    &[MATCH_STATUS_ACTIVE, MATCH_STATUS_PAUSED, MATCH_STATUS_ENDED];

// ---------------------------------------------------------------------------
// Request bounds
// ---------------------------------------------------------------------------

/// Look-back window for the `recent` listings when the caller gives none.
pub const DEFAULT_RECENT_HOURS: i64 = 24;
pub const MAX_RECENT_HOURS: i64 = 24 * 30;

/// Matches untouched for this many days are ended by the inactivity sweep.
pub const DEFAULT_INACTIVE_MATCH_DAYS: i64 = 30;
pub const MAX_INACTIVE_MATCH_DAYS: i64 = 365;

/// Page size for potential matches.
pub const DEFAULT_POTENTIAL_LIMIT: i64 = 20;
pub const MAX_POTENTIAL_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Match status
// ---------------------------------------------------------------------------

/// Lifecycle status of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Active,
    Paused,
    Ended,
}

impl MatchStatus {
    /// Convert from a database string value. Case-insensitive.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_lowercase().as_str() {
            MATCH_STATUS_ACTIVE => Ok(Self::Active),
            MATCH_STATUS_PAUSED => Ok(Self::Paused),
            MATCH_STATUS_ENDED => Ok(Self::Ended),
            _ => Err(CoreError::Validation(format!(
                "Invalid match status '{s}'. Must be one of: {}",
                VALID_MATCH_STATUSES.join(", ")
            ))),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => MATCH_STATUS_ACTIVE,
            Self::Paused => MATCH_STATUS_PAUSED,
            Self::Ended => MATCH_STATUS_ENDED,
        }
    }
}

/// Check that a match may move from `from` to `to`.
///
/// Staying in the same status is allowed (a no-op). Nothing leaves `ended`.
pub fn validate_status_transition(
    match_id: DbId,
    from: MatchStatus,
    to: MatchStatus,
) -> Result<(), CoreError> {
    if from == MatchStatus::Ended && to != MatchStatus::Ended {
        return Err(CoreError::Conflict(format!(
            "Match {match_id} has ended and cannot become {}",
            to.as_str()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Likes and pairs
// ---------------------------------------------------------------------------

/// A like must point at somebody else.
pub fn validate_like_target(from_user_id: DbId, to_user_id: DbId) -> Result<(), CoreError> {
    if from_user_id == to_user_id {
        return Err(CoreError::Validation(
            "User cannot like themselves".to_string(),
        ));
    }
    Ok(())
}

/// Order a user pair the way `matches` stores it (`user1_id < user2_id`).
pub fn ordered_pair(a: DbId, b: DbId) -> (DbId, DbId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

// ---------------------------------------------------------------------------
// Query parameter bounds
// ---------------------------------------------------------------------------

pub fn validate_recent_hours(hours: i64) -> Result<(), CoreError> {
    check_range("hours", hours, 1, MAX_RECENT_HOURS)
}

pub fn validate_inactive_days(days: i64) -> Result<(), CoreError> {
    check_range("days", days, 1, MAX_INACTIVE_MATCH_DAYS)
}

pub fn validate_potential_limit(limit: i64) -> Result<(), CoreError> {
    check_range("limit", limit, 1, MAX_POTENTIAL_LIMIT)
}

fn check_range(name: &str, value: i64, min: i64, max: i64) -> Result<(), CoreError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{name} must be between {min} and {max}, got {value}"
        )))
    }
}
