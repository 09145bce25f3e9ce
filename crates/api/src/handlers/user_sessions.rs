//! Handlers for the `/user-sessions` resource and the per-user session routes
//! under `/users/{id}/sessions`.
//!
//! All handlers require a valid session.

use amora_core::error::CoreError;
use amora_core::types::DbId;
use amora_core::validation::validate_extend_days;
use amora_db::models::session::UserSessionResponse;
use amora_db::repositories::SessionRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PATCH /user-sessions/{id}/extend`.
#[derive(Debug, Deserialize)]
pub struct ExtendSessionRequest {
    pub days: Option<i64>,
}

/// Body of `GET /user-sessions/validate/{token_hash}`.
#[derive(Debug, Serialize)]
pub struct TokenHashValidity {
    pub is_valid: bool,
}

/// Body of `PATCH /users/{id}/sessions/deactivate-all`.
#[derive(Debug, Serialize)]
pub struct SessionsDeactivated {
    pub deactivated: u64,
    /// Active sessions left for the user afterwards.
    pub remaining_active: i64,
}

/// Body of `POST /user-sessions/cleanup-expired`.
#[derive(Debug, Serialize)]
pub struct ExpiredSessionsDeleted {
    pub deleted: u64,
}

type SessionList = Json<DataResponse<Vec<UserSessionResponse>>>;

fn to_list(sessions: &[amora_db::models::session::UserSession]) -> SessionList {
    Json(DataResponse {
        data: sessions.iter().map(UserSessionResponse::from).collect(),
    })
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "UserSession",
        id,
    })
}

/// GET /api/v1/user-sessions
pub async fn list_sessions(State(state): State<AppState>, _auth: AuthUser) -> AppResult<SessionList> {
    let sessions = SessionRepo::list(&state.pool).await?;
    Ok(to_list(&sessions))
}

/// GET /api/v1/user-sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserSessionResponse>>> {
    let session = SessionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse {
        data: UserSessionResponse::from(&session),
    }))
}

/// GET /api/v1/user-sessions/token/{token_hash}
pub async fn get_session_by_token_hash(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(token_hash): Path<String>,
) -> AppResult<Json<DataResponse<UserSessionResponse>>> {
    let session = SessionRepo::find_by_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| AppError::Database(sqlx::Error::RowNotFound))?;
    Ok(Json(DataResponse {
        data: UserSessionResponse::from(&session),
    }))
}

/// GET /api/v1/user-sessions/ip/{ip}
pub async fn list_sessions_by_ip(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(ip): Path<String>,
) -> AppResult<SessionList> {
    let sessions = SessionRepo::list_by_ip(&state.pool, &ip).await?;
    Ok(to_list(&sessions))
}

/// GET /api/v1/users/{id}/sessions
pub async fn list_user_sessions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<DbId>,
) -> AppResult<SessionList> {
    let sessions = SessionRepo::list_for_user(&state.pool, user_id).await?;
    Ok(to_list(&sessions))
}

/// GET /api/v1/users/{id}/sessions/active
pub async fn list_active_user_sessions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<DbId>,
) -> AppResult<SessionList> {
    let sessions = SessionRepo::list_active_for_user(&state.pool, user_id).await?;
    Ok(to_list(&sessions))
}

/// GET /api/v1/user-sessions/validate/{token_hash}
///
/// A token hash is valid when its session is active and unexpired.
pub async fn validate_token_hash(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(token_hash): Path<String>,
) -> AppResult<Json<DataResponse<TokenHashValidity>>> {
    let is_valid = SessionRepo::find_by_token_hash(&state.pool, &token_hash)
        .await?
        .is_some_and(|s| s.is_usable_at(Utc::now()));
    Ok(Json(DataResponse {
        data: TokenHashValidity { is_valid },
    }))
}

/// PATCH /api/v1/user-sessions/{id}/extend
///
/// Push the expiry to `now + days` (1..=365). Without `days` the session gets
/// a full session lifetime (`SESSION_TTL_DAYS`).
pub async fn extend_session(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ExtendSessionRequest>,
) -> AppResult<Json<DataResponse<UserSessionResponse>>> {
    let days = input.days.unwrap_or(state.config.session.ttl_days);
    validate_extend_days(days).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let expires_at = Utc::now() + chrono::Duration::days(days);
    let session = SessionRepo::extend(&state.pool, id, expires_at)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(session_id = id, days, "Session extended");

    Ok(Json(DataResponse {
        data: UserSessionResponse::from(&session),
    }))
}

/// PATCH /api/v1/user-sessions/{id}/deactivate
pub async fn deactivate_session(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if SessionRepo::deactivate(&state.pool, id).await? {
        tracing::info!(session_id = id, "Session deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// PATCH /api/v1/users/{id}/sessions/deactivate-all
pub async fn deactivate_user_sessions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<SessionsDeactivated>>> {
    let deactivated = SessionRepo::deactivate_all_for_user(&state.pool, user_id).await?;
    let remaining_active = SessionRepo::count_active_for_user(&state.pool, user_id).await?;
    tracing::info!(user_id, deactivated, "User sessions deactivated");

    Ok(Json(DataResponse {
        data: SessionsDeactivated {
            deactivated,
            remaining_active,
        },
    }))
}

/// DELETE /api/v1/user-sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if SessionRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// POST /api/v1/user-sessions/cleanup-expired
pub async fn cleanup_expired(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<ExpiredSessionsDeleted>>> {
    let deleted = SessionRepo::delete_expired(&state.pool).await?;
    tracing::info!(deleted, "Expired sessions deleted");
    Ok(Json(DataResponse {
        data: ExpiredSessionsDeleted { deleted },
    }))
}
