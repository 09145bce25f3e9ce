//! Session lifecycle: establish, authenticate, refresh, logout.
//!
//! A session is a `user_sessions` row bound to one browser fingerprint. The
//! row stores the SHA-256 of the single token currently accepted for it, so
//! rotating the token invalidates every earlier copy.
//!
//! Every path that trusts a presented token runs the same check: the token
//! decodes, its fingerprint equals the request's, and the referenced row is
//! active, unexpired, owned by the token's user and stores this token's hash.

use std::sync::Arc;

use amora_core::types::{DbId, Timestamp};
use amora_db::models::session::{CreateSession, UserSession};
use amora_db::models::user::CreateUser;
use chrono::Utc;

use crate::auth::error::AuthError;
use crate::auth::password::LOCKED_PASSWORD_HASH;
use crate::auth::store::SessionStore;
use crate::auth::token::{hash_token, SessionClaims, TokenCodec};

/// First name given to users created for an anonymous browser.
pub const GUEST_FIRST_NAME: &str = "Guest";

/// Domain of the generated guest email addresses.
pub const GUEST_EMAIL_DOMAIN: &str = "guest.amora.local";

/// Result of [`SessionManager::establish`].
#[derive(Debug, Clone)]
pub struct EstablishedSession {
    pub user_id: DbId,
    pub session_id: DbId,
    pub is_new_user: bool,
    pub token: String,
}

/// A verified session, as seen by an authenticated request.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub user_id: DbId,
    pub session_id: DbId,
    pub fingerprint_hash: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

/// A freshly minted token for an existing session.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub user_id: DbId,
    pub session_id: DbId,
    pub token: String,
}

/// What [`SessionManager::logout`] did. The cookie is cleared either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    Revoked { session_id: DbId },
    Cleared,
}

/// Issues and verifies browser sessions.
pub struct SessionManager {
    codec: TokenCodec,
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    pub fn new(codec: TokenCodec, store: Arc<dyn SessionStore>) -> Self {
        Self { codec, store }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// `Max-Age` for the session cookie; equals the token lifetime.
    pub fn cookie_max_age_secs(&self) -> i64 {
        self.codec.ttl().num_seconds()
    }

    /// Continue the presented session if it is still good, else start a new one.
    ///
    /// Only store failures are returned as errors; any problem with the
    /// presented token falls through to a new session.
    pub async fn establish(
        &self,
        token: Option<&str>,
        fingerprint_hash: &str,
        client_ip: Option<&str>,
    ) -> Result<EstablishedSession, AuthError> {
        if let Some(token) = token {
            match self.verify(token, fingerprint_hash).await {
                Ok((claims, _)) => {
                    let issued = self
                        .rotate(claims.user_id, &claims.fingerprint_hash, claims.session_id)
                        .await?;
                    tracing::info!(
                        user_id = issued.user_id,
                        session_id = issued.session_id,
                        "Session refreshed"
                    );
                    return Ok(EstablishedSession {
                        user_id: issued.user_id,
                        session_id: issued.session_id,
                        is_new_user: false,
                        token: issued.token,
                    });
                }
                Err(AuthError::Store(e)) => return Err(AuthError::Store(e)),
                Err(AuthError::Internal(msg)) => return Err(AuthError::Internal(msg)),
                Err(reason) => {
                    tracing::debug!(reason = %reason, "Presented session not reusable, starting new one");
                }
            }
        }

        self.create_new_session(fingerprint_hash, client_ip).await
    }

    /// Verify the presented token against the request fingerprint and the session row.
    pub async fn authenticate(
        &self,
        token: Option<&str>,
        fingerprint_hash: &str,
    ) -> Result<CurrentSession, AuthError> {
        let Some(token) = token else {
            tracing::debug!("Request carries no session token");
            return Err(AuthError::MissingToken);
        };

        let (claims, session) = self.verify(token, fingerprint_hash).await.inspect_err(|e| {
            if e.is_unauthorized() {
                tracing::warn!(reason = %e, "Session authentication failed");
            }
        })?;

        Ok(CurrentSession {
            user_id: claims.user_id,
            session_id: session.id,
            fingerprint_hash: claims.fingerprint_hash,
            expires_at: session.expires_at,
            created_at: session.created_at,
        })
    }

    /// Authenticate the presented token, then replace it with a new one.
    pub async fn refresh(
        &self,
        token: Option<&str>,
        fingerprint_hash: &str,
    ) -> Result<IssuedToken, AuthError> {
        let current = self.authenticate(token, fingerprint_hash).await?;
        let issued = self
            .rotate(current.user_id, &current.fingerprint_hash, current.session_id)
            .await?;
        tracing::info!(
            user_id = issued.user_id,
            session_id = issued.session_id,
            "Session token rotated"
        );
        Ok(issued)
    }

    /// Deactivate the presented session. Never fails.
    pub async fn logout(&self, token: Option<&str>, fingerprint_hash: &str) -> LogoutOutcome {
        let current = match self.authenticate(token, fingerprint_hash).await {
            Ok(current) => current,
            Err(e) => {
                tracing::debug!(reason = %e, "Logout without a valid session");
                return LogoutOutcome::Cleared;
            }
        };

        match self.store.deactivate_session(current.session_id).await {
            Ok(_) => {
                tracing::info!(
                    user_id = current.user_id,
                    session_id = current.session_id,
                    "Session revoked"
                );
                LogoutOutcome::Revoked {
                    session_id: current.session_id,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, session_id = current.session_id, "Failed to revoke session");
                LogoutOutcome::Cleared
            }
        }
    }

    /// Deactivate every session of the current user except the current one.
    pub async fn revoke_other_sessions(&self, current: &CurrentSession) -> Result<u64, AuthError> {
        let count = self
            .store
            .deactivate_all_user_sessions_except_current(current.user_id, current.session_id)
            .await?;
        tracing::info!(
            user_id = current.user_id,
            session_id = current.session_id,
            revoked = count,
            "Other sessions revoked"
        );
        Ok(count)
    }

    async fn verify(
        &self,
        token: &str,
        fingerprint_hash: &str,
    ) -> Result<(SessionClaims, UserSession), AuthError> {
        let claims = self.codec.decode(token)?;
        if claims.fingerprint_hash != fingerprint_hash {
            return Err(AuthError::FingerprintMismatch);
        }

        let session = self
            .store
            .get_session_by_id(claims.session_id)
            .await?
            .ok_or(AuthError::SessionInactiveOrMissing)?;

        if !session.is_usable_at(Utc::now())
            || session.user_id != claims.user_id
            || session.jwt_token_hash != hash_token(token)
        {
            return Err(AuthError::SessionInactiveOrMissing);
        }

        Ok((claims, session))
    }

    /// Mint a new token for an existing session and persist its hash.
    async fn rotate(
        &self,
        user_id: DbId,
        fingerprint_hash: &str,
        session_id: DbId,
    ) -> Result<IssuedToken, AuthError> {
        let token = self.codec.encode(user_id, fingerprint_hash, session_id)?;
        let expires_at = Utc::now() + self.codec.ttl();

        let updated = self
            .store
            .update_session(session_id, &hash_token(&token), expires_at)
            .await?;
        if !updated {
            return Err(AuthError::SessionInactiveOrMissing);
        }
        self.store.update_user_activity(user_id).await?;

        Ok(IssuedToken {
            user_id,
            session_id,
            token,
        })
    }

    async fn create_new_session(
        &self,
        fingerprint_hash: &str,
        client_ip: Option<&str>,
    ) -> Result<EstablishedSession, AuthError> {
        let user_id = match self.store.find_user_by_fingerprint(fingerprint_hash).await? {
            Some(user_id) => user_id,
            None => self.create_guest_user().await?,
        };

        // The row must exist before its id can be embedded in the token.
        let placeholder = CreateSession {
            user_id,
            fingerprint_hash: fingerprint_hash.to_string(),
            jwt_token_hash: format!("pending-{}", uuid::Uuid::new_v4().simple()),
            expires_at: Utc::now() + self.codec.ttl(),
            ip_address: client_ip.map(str::to_string),
        };
        let session = self.store.create_session(&placeholder).await?;

        let token = self.codec.encode(user_id, fingerprint_hash, session.id)?;
        self.store
            .update_session(session.id, &hash_token(&token), session.expires_at)
            .await?;

        tracing::info!(user_id, session_id = session.id, "Session established");

        Ok(EstablishedSession {
            user_id,
            session_id: session.id,
            is_new_user: true,
            token,
        })
    }

    async fn create_guest_user(&self) -> Result<DbId, AuthError> {
        let input = CreateUser {
            email: format!(
                "guest-{}@{GUEST_EMAIL_DOMAIN}",
                uuid::Uuid::new_v4().simple()
            ),
            password_hash: LOCKED_PASSWORD_HASH.to_string(),
            first_name: GUEST_FIRST_NAME.to_string(),
        };
        let user_id = self.store.create_user(&input).await?;
        tracing::info!(user_id, "Guest user created");
        Ok(user_id)
    }
}
