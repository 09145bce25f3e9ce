//! Persistence seam used by the session manager.
//!
//! [`PgSessionStore`] is the production implementation backed by the
//! repositories in `amora_db`. Tests substitute an in-memory store.

use amora_core::types::{DbId, Timestamp};
use amora_db::models::session::{CreateSession, UserSession};
use amora_db::models::user::CreateUser;
use amora_db::repositories::{SessionRepo, UserRepo};
use amora_db::DbPool;
use async_trait::async_trait;

/// Session and user storage operations needed to run the session lifecycle.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    async fn get_session_by_id(&self, id: DbId) -> Result<Option<UserSession>, sqlx::Error>;

    async fn create_session(&self, input: &CreateSession) -> Result<UserSession, sqlx::Error>;

    /// Overwrite the stored token hash and expiry. Returns `false` if no row matched.
    async fn update_session(
        &self,
        id: DbId,
        jwt_token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<bool, sqlx::Error>;

    /// Returns `false` if the session was missing or already inactive.
    async fn deactivate_session(&self, id: DbId) -> Result<bool, sqlx::Error>;

    async fn deactivate_all_user_sessions_except_current(
        &self,
        user_id: DbId,
        current_session_id: DbId,
    ) -> Result<u64, sqlx::Error>;

    /// Owner of the most recent active session carrying this fingerprint.
    async fn find_user_by_fingerprint(
        &self,
        fingerprint_hash: &str,
    ) -> Result<Option<DbId>, sqlx::Error>;

    async fn create_user(&self, input: &CreateUser) -> Result<DbId, sqlx::Error>;

    async fn update_user_activity(&self, user_id: DbId) -> Result<(), sqlx::Error>;
}

/// [`SessionStore`] over PostgreSQL.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: DbPool,
}

impl PgSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn get_session_by_id(&self, id: DbId) -> Result<Option<UserSession>, sqlx::Error> {
        SessionRepo::find_by_id(&self.pool, id).await
    }

    async fn create_session(&self, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        SessionRepo::create(&self.pool, input).await
    }

    async fn update_session(
        &self,
        id: DbId,
        jwt_token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        SessionRepo::rotate_token(&self.pool, id, jwt_token_hash, expires_at).await
    }

    async fn deactivate_session(&self, id: DbId) -> Result<bool, sqlx::Error> {
        SessionRepo::deactivate(&self.pool, id).await
    }

    async fn deactivate_all_user_sessions_except_current(
        &self,
        user_id: DbId,
        current_session_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        SessionRepo::deactivate_all_for_user_except(&self.pool, user_id, current_session_id).await
    }

    async fn find_user_by_fingerprint(
        &self,
        fingerprint_hash: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let session =
            SessionRepo::find_latest_active_by_fingerprint(&self.pool, fingerprint_hash).await?;
        Ok(session.map(|s| s.user_id))
    }

    async fn create_user(&self, input: &CreateUser) -> Result<DbId, sqlx::Error> {
        let user = UserRepo::create(&self.pool, input).await?;
        Ok(user.id)
    }

    async fn update_user_activity(&self, user_id: DbId) -> Result<(), sqlx::Error> {
        UserRepo::touch_activity(&self.pool, user_id).await?;
        Ok(())
    }
}
