//! Handlers for the `/auth` resource (browser sessions).
//!
//! The session token travels only in the `session_token` cookie; response
//! bodies never contain it.

use amora_core::error::CoreError;
use amora_core::fingerprint::FingerprintComponents;
use amora_core::types::{DbId, Timestamp};
use amora_db::models::user::UserResponse;
use amora_db::repositories::{SessionRepo, UserRepo};
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::auth::cookie::{cleared_session_cookie, session_cookie};
use crate::auth::session::LogoutOutcome;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::session::SessionRequest;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Body of `POST /auth/session`.
#[derive(Debug, Serialize)]
pub struct SessionEstablished {
    pub user_id: DbId,
    pub session_id: DbId,
    pub is_new_user: bool,
}

/// Body of `GET /auth/current-user`.
#[derive(Debug, Serialize)]
pub struct CurrentUser {
    pub user_id: DbId,
    pub session_id: DbId,
    pub user: UserResponse,
}

/// Body of `POST /auth/logout`.
#[derive(Debug, Serialize)]
pub struct LoggedOut {
    pub message: &'static str,
    /// Session that was revoked, if the request carried a valid one.
    pub session_id: Option<DbId>,
}

/// Body of `GET /auth/session/validate`.
#[derive(Debug, Default, Serialize)]
pub struct SessionValidity {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Body of `POST /auth/session/refresh`.
#[derive(Debug, Serialize)]
pub struct SessionRefreshed {
    pub user_id: DbId,
    pub session_id: DbId,
}

/// Body of `GET /auth/session/info`.
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub user_id: DbId,
    pub session_id: DbId,
    pub fingerprint_hash: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    /// Active sessions of this user across all browsers, including this one.
    pub active_session_count: i64,
}

/// Body of `DELETE /auth/sessions/others`.
#[derive(Debug, Serialize)]
pub struct OtherSessionsRevoked {
    pub revoked: u64,
}

/// Body of `GET /auth/fingerprint`.
#[derive(Debug, Serialize)]
pub struct FingerprintDebug {
    pub fingerprint_hash: String,
    pub components: FingerprintComponents,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/session
///
/// Refresh the presented session or start a new one, and set the cookie.
pub async fn establish_session(
    State(state): State<AppState>,
    request: SessionRequest,
) -> AppResult<Response> {
    let established = state
        .sessions
        .establish(
            request.token(),
            &request.fingerprint_hash,
            request.client_ip.as_deref(),
        )
        .await?;

    let cookie = session_cookie(&established.token, state.sessions.cookie_max_age_secs())?;
    let body = SessionEstablished {
        user_id: established.user_id,
        session_id: established.session_id,
        is_new_user: established.is_new_user,
    };

    Ok(([(SET_COOKIE, cookie)], Json(DataResponse { data: body })).into_response())
}

/// GET /api/v1/auth/current-user
pub async fn current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<CurrentUser>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    Ok(Json(DataResponse {
        data: CurrentUser {
            user_id: auth.user_id,
            session_id: auth.session_id,
            user: UserResponse::from(&user),
        },
    }))
}

/// POST /api/v1/auth/logout
///
/// Revoke the current session if there is one. Always succeeds and always
/// clears the cookie.
pub async fn logout(State(state): State<AppState>, request: SessionRequest) -> Response {
    let outcome = state
        .sessions
        .logout(request.token(), &request.fingerprint_hash)
        .await;

    let session_id = match outcome {
        LogoutOutcome::Revoked { session_id } => Some(session_id),
        LogoutOutcome::Cleared => None,
    };
    let body = LoggedOut {
        message: "Logged out",
        session_id,
    };

    (
        [(SET_COOKIE, cleared_session_cookie())],
        Json(DataResponse { data: body }),
    )
        .into_response()
}

/// GET /api/v1/auth/session/validate
///
/// Report whether the presented session is valid. Never fails.
pub async fn validate_session(
    State(state): State<AppState>,
    request: SessionRequest,
) -> Json<DataResponse<SessionValidity>> {
    let validity = match state
        .sessions
        .authenticate(request.token(), &request.fingerprint_hash)
        .await
    {
        Ok(current) => SessionValidity {
            is_valid: true,
            user_id: Some(current.user_id),
            session_id: Some(current.session_id),
            expires_at: Some(current.expires_at),
            reason: None,
        },
        Err(e) => {
            if !e.is_unauthorized() {
                tracing::error!(error = %e, "Session validation failed");
            }
            SessionValidity {
                reason: Some(e.to_string()),
                ..Default::default()
            }
        }
    };

    Json(DataResponse { data: validity })
}

/// POST /api/v1/auth/session/refresh
///
/// Rotate the session token. The previous token stops working.
pub async fn refresh_session(
    State(state): State<AppState>,
    request: SessionRequest,
) -> AppResult<Response> {
    let issued = state
        .sessions
        .refresh(request.token(), &request.fingerprint_hash)
        .await?;

    let cookie = session_cookie(&issued.token, state.sessions.cookie_max_age_secs())?;
    let body = SessionRefreshed {
        user_id: issued.user_id,
        session_id: issued.session_id,
    };

    Ok(([(SET_COOKIE, cookie)], Json(DataResponse { data: body })).into_response())
}

/// GET /api/v1/auth/session/info
pub async fn session_info(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<SessionInfo>>> {
    let active_session_count = SessionRepo::count_active_for_user(&state.pool, auth.user_id).await?;
    let session = auth.session;

    Ok(Json(DataResponse {
        data: SessionInfo {
            user_id: session.user_id,
            session_id: session.session_id,
            fingerprint_hash: session.fingerprint_hash,
            created_at: session.created_at,
            expires_at: session.expires_at,
            active_session_count,
        },
    }))
}

/// DELETE /api/v1/auth/sessions/others
///
/// Sign out every other browser of the current user.
pub async fn revoke_other_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<OtherSessionsRevoked>>> {
    let revoked = state.sessions.revoke_other_sessions(&auth.session).await?;
    Ok(Json(DataResponse {
        data: OtherSessionsRevoked { revoked },
    }))
}

/// GET /api/v1/auth/fingerprint
///
/// Debug view of the fingerprint computed for this request.
pub async fn fingerprint(request: SessionRequest) -> Json<DataResponse<FingerprintDebug>> {
    Json(DataResponse {
        data: FingerprintDebug {
            fingerprint_hash: request.fingerprint_hash,
            components: request.fingerprint,
        },
    })
}
