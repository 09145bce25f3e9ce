//! Route definitions for the `/user-sessions` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::user_sessions;
use crate::state::AppState;

/// Routes for `/user-sessions`. All require a session, but any guest session
/// qualifies and no ownership check is made, so they are effectively open to
/// any browser (see [`AuthUser`](crate::middleware::auth::AuthUser)).
///
/// ```text
/// GET    /user-sessions             -> list_sessions
/// POST   /cleanup-expired           -> cleanup_expired
/// GET    /token/{token_hash}        -> get_session_by_token_hash
/// GET    /ip/{ip}                   -> list_sessions_by_ip
/// GET    /validate/{token_hash}     -> validate_token_hash
/// GET    /{id}                      -> get_session
/// DELETE /{id}                      -> delete_session
/// PATCH  /{id}/extend               -> extend_session
/// PATCH  /{id}/deactivate           -> deactivate_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user-sessions", get(user_sessions::list_sessions))
        .route(
            "/user-sessions/cleanup-expired",
            post(user_sessions::cleanup_expired),
        )
        .route(
            "/user-sessions/token/{token_hash}",
            get(user_sessions::get_session_by_token_hash),
        )
        .route(
            "/user-sessions/ip/{ip}",
            get(user_sessions::list_sessions_by_ip),
        )
        .route(
            "/user-sessions/validate/{token_hash}",
            get(user_sessions::validate_token_hash),
        )
        .route(
            "/user-sessions/{id}",
            get(user_sessions::get_session).delete(user_sessions::delete_session),
        )
        .route(
            "/user-sessions/{id}/extend",
            patch(user_sessions::extend_session),
        )
        .route(
            "/user-sessions/{id}/deactivate",
            patch(user_sessions::deactivate_session),
        )
}
