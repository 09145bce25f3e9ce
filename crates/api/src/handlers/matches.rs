//! Handlers for the `/matches` resource and `/users/{id}/matches`.

use amora_core::error::CoreError;
use amora_core::matching::{
    validate_inactive_days, validate_like_target, validate_recent_hours, validate_status_transition,
    MatchStatus, DEFAULT_INACTIVE_MATCH_DAYS, DEFAULT_RECENT_HOURS,
};
use amora_core::types::DbId;
use amora_db::models::matches::{Match, MatchCounts, UserMatch, UserMatchStats};
use amora_db::repositories::{LikeRepo, MatchRepo};
use amora_db::DbPool;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::likes::RecentParams;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PATCH /matches/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Request body for `POST /matches/from-likes`.
#[derive(Debug, Deserialize)]
pub struct FromLikesRequest {
    pub user_id: DbId,
}

/// Body of `POST /matches/from-likes`.
#[derive(Debug, Serialize)]
pub struct MatchFromLikes {
    pub is_mutual: bool,
    #[serde(rename = "match")]
    pub matched: Option<Match>,
}

/// Request body for `POST /matches/end-inactive`.
#[derive(Debug, Deserialize)]
pub struct EndInactiveRequest {
    pub days: Option<i64>,
}

/// Body of `POST /matches/end-inactive`.
#[derive(Debug, Serialize)]
pub struct InactiveMatchesEnded {
    pub ended_matches: usize,
    pub match_ids: Vec<DbId>,
    pub inactive_days: i64,
}

/// Query string for `GET /users/{id}/matches`.
#[derive(Debug, Deserialize)]
pub struct UserMatchParams {
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

/// Create the match for a pair that likes each other.
///
/// Returns `None` when the likes are not mutual. When a match already exists
/// it is returned unchanged (an ended match stays ended).
pub async fn match_if_mutual(pool: &DbPool, a: DbId, b: DbId) -> AppResult<Option<Match>> {
    if !LikeRepo::is_mutual(pool, a, b).await? {
        return Ok(None);
    }
    let (matched, created) = MatchRepo::create_for_pair(pool, a, b).await?;
    if created {
        tracing::info!(
            match_id = matched.id,
            user1_id = matched.user1_id,
            user2_id = matched.user2_id,
            "Match created"
        );
    } else {
        tracing::debug!(match_id = matched.id, "Match already exists");
    }
    Ok(Some(matched))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/matches
pub async fn list_matches(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Match>>>> {
    let matches = MatchRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: matches }))
}

/// GET /api/v1/matches/recent?hours=24
pub async fn recent_matches(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<RecentParams>,
) -> AppResult<Json<DataResponse<Vec<Match>>>> {
    let hours = params.hours.unwrap_or(DEFAULT_RECENT_HOURS);
    validate_recent_hours(hours)?;
    let since = Utc::now() - chrono::Duration::hours(hours);
    let matches = MatchRepo::list_since(&state.pool, since).await?;
    Ok(Json(DataResponse { data: matches }))
}

/// GET /api/v1/matches/stats
pub async fn match_counts(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<MatchCounts>>> {
    let counts = MatchRepo::counts(&state.pool).await?;
    Ok(Json(DataResponse { data: counts }))
}

/// POST /api/v1/matches/from-likes
///
/// Match the caller with `user_id` if they like each other.
pub async fn create_from_likes(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<FromLikesRequest>,
) -> AppResult<Json<DataResponse<MatchFromLikes>>> {
    validate_like_target(auth.user_id, input.user_id)?;
    let matched = match_if_mutual(&state.pool, auth.user_id, input.user_id).await?;
    Ok(Json(DataResponse {
        data: MatchFromLikes {
            is_mutual: matched.is_some(),
            matched,
        },
    }))
}

/// POST /api/v1/matches/end-inactive
///
/// End active and paused matches untouched for `days` (default 30).
pub async fn end_inactive_matches(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<EndInactiveRequest>,
) -> AppResult<Json<DataResponse<InactiveMatchesEnded>>> {
    let days = input.days.unwrap_or(DEFAULT_INACTIVE_MATCH_DAYS);
    validate_inactive_days(days)?;

    let older_than = Utc::now() - chrono::Duration::days(days);
    let match_ids = MatchRepo::end_inactive(&state.pool, older_than).await?;
    if !match_ids.is_empty() {
        tracing::info!(count = match_ids.len(), days, "Inactive matches ended");
    }

    Ok(Json(DataResponse {
        data: InactiveMatchesEnded {
            ended_matches: match_ids.len(),
            match_ids,
            inactive_days: days,
        },
    }))
}

/// GET /api/v1/matches/{id}
pub async fn get_match(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Match>>> {
    let matched = find_match(&state.pool, id).await?;
    Ok(Json(DataResponse { data: matched }))
}

/// PATCH /api/v1/matches/{id}/status
///
/// Move a match between `active` and `paused`, or end it. Ended matches
/// cannot be reopened (409).
pub async fn update_match_status(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<Match>>> {
    let target = MatchStatus::from_str_value(&input.status)?;
    let current = find_match(&state.pool, id).await?;
    let from = current.status()?;
    validate_status_transition(id, from, target)?;

    if from == target {
        return Ok(Json(DataResponse { data: current }));
    }

    let updated = MatchRepo::update_status(&state.pool, id, target.as_str())
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(
        match_id = id,
        from = from.as_str(),
        to = target.as_str(),
        "Match status changed"
    );

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/matches/{id}
pub async fn delete_match(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if MatchRepo::delete(&state.pool, id).await? {
        tracing::info!(match_id = id, "Match deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/users/{id}/matches?status=active
pub async fn user_matches(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<DbId>,
    Query(params): Query<UserMatchParams>,
) -> AppResult<Json<DataResponse<Vec<UserMatch>>>> {
    let status = params
        .status
        .as_deref()
        .map(MatchStatus::from_str_value)
        .transpose()?;
    let matches =
        MatchRepo::list_for_user(&state.pool, user_id, status.as_ref().map(MatchStatus::as_str))
            .await?;
    Ok(Json(DataResponse { data: matches }))
}

/// GET /api/v1/users/{id}/matches/stats
pub async fn user_match_stats(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserMatchStats>>> {
    let stats = MatchRepo::stats_for_user(&state.pool, user_id).await?;
    Ok(Json(DataResponse { data: stats }))
}

async fn find_match(pool: &DbPool, id: DbId) -> AppResult<Match> {
    MatchRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Match",
        id,
    })
}
