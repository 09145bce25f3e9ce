//! Route definitions for the `/auth` resource.

use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST   /session           -> establish_session
/// GET    /current-user      -> current_user (requires session)
/// POST   /logout            -> logout
/// GET    /session/validate  -> validate_session
/// POST   /session/refresh   -> refresh_session
/// GET    /session/info      -> session_info (requires session)
/// DELETE /sessions/others   -> revoke_other_sessions (requires session)
/// GET    /fingerprint       -> fingerprint
/// ```
///
/// Every response here is marked `Cache-Control: no-store`; most of them set
/// or clear the session cookie or describe the caller's session.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", post(auth::establish_session))
        .route("/current-user", get(auth::current_user))
        .route("/logout", post(auth::logout))
        .route("/session/validate", get(auth::validate_session))
        .route("/session/refresh", post(auth::refresh_session))
        .route("/session/info", get(auth::session_info))
        .route("/sessions/others", delete(auth::revoke_other_sessions))
        .route("/fingerprint", get(auth::fingerprint))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
