//! Cookie-session authentication extractor for Axum handlers.

use amora_core::types::DbId;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::session::CurrentSession;
use crate::error::AppError;
use crate::middleware::session::SessionRequest;
use crate::state::AppState;

/// Authenticated caller, verified from the `session_token` cookie and the
/// request's browser fingerprint.
///
/// This proves the request carries a live session, nothing more. Any browser
/// gets a guest session from `POST /auth/session`, and there are no roles, so
/// a route guarded only by `AuthUser` is effectively unauthenticated: every
/// caller may act on every user and session id it names.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub session_id: DbId,
    /// Full verified session, including its expiry.
    pub session: CurrentSession,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let request = SessionRequest::from_headers(&parts.headers);
        let session = state
            .sessions
            .authenticate(request.token(), &request.fingerprint_hash)
            .await?;

        Ok(AuthUser {
            user_id: session.user_id,
            session_id: session.session_id,
            session,
        })
    }
}
