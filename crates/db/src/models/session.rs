//! User session model and DTOs.

use amora_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A user session row from the `user_sessions` table.
///
/// Binds one browser fingerprint to one user. `jwt_token_hash` holds the
/// SHA-256 of the only token currently accepted for this session.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub fingerprint_hash: String,
    pub jwt_token_hash: String,
    pub expires_at: Timestamp,
    pub ip_address: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserSession {
    /// Whether the session may still authenticate requests at `now`.
    pub fn is_usable_at(&self, now: Timestamp) -> bool {
        self.is_active && self.expires_at > now
    }
}

/// Session representation for API responses (no token hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserSessionResponse {
    pub id: DbId,
    pub user_id: DbId,
    pub fingerprint_hash: String,
    pub expires_at: Timestamp,
    pub ip_address: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&UserSession> for UserSessionResponse {
    fn from(session: &UserSession) -> Self {
        Self {
            id: session.id,
            user_id: session.user_id,
            fingerprint_hash: session.fingerprint_hash.clone(),
            expires_at: session.expires_at,
            ip_address: session.ip_address.clone(),
            is_active: session.is_active,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

/// DTO for creating a new user session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub user_id: DbId,
    pub fingerprint_hash: String,
    pub jwt_token_hash: String,
    pub expires_at: Timestamp,
    pub ip_address: Option<String>,
}
