//! Handlers for the `/likes` resource and the per-user like routes under
//! `/users/{id}/likes`.
//!
//! Likes are always given by the caller's session user. A like that completes
//! a mutual pair creates the match in the same request.

use amora_core::error::CoreError;
use amora_core::matching::{
    validate_like_target, validate_potential_limit, validate_recent_hours, DEFAULT_POTENTIAL_LIMIT,
    DEFAULT_RECENT_HOURS,
};
use amora_core::types::DbId;
use amora_db::models::like::{LikeStats, LikedUser, UserLike};
use amora_db::models::matches::Match;
use amora_db::repositories::{LikeRepo, UserRepo};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::matches::match_if_mutual;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /likes`.
#[derive(Debug, Deserialize)]
pub struct CreateLikeRequest {
    pub to_user_id: DbId,
}

/// Body of `POST /likes`.
#[derive(Debug, Serialize)]
pub struct LikeCreated {
    pub like: UserLike,
    /// The match this like completed, or the one that already existed.
    #[serde(rename = "match")]
    pub matched: Option<Match>,
}

/// Query string for `GET /likes/recent`.
#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub hours: Option<i64>,
}

/// Query string for `GET /users/{id}/likes/potential`.
#[derive(Debug, Deserialize)]
pub struct PotentialParams {
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/likes
///
/// Like another user. Self-likes and repeated likes are rejected with 400.
pub async fn create_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateLikeRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<LikeCreated>>)> {
    let from_user_id = auth.user_id;
    let to_user_id = input.to_user_id;
    validate_like_target(from_user_id, to_user_id)?;

    if UserRepo::find_by_id(&state.pool, to_user_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: to_user_id,
        }));
    }
    if LikeRepo::exists(&state.pool, from_user_id, to_user_id).await? {
        return Err(AppError::BadRequest(format!(
            "Like from user {from_user_id} to user {to_user_id} already exists"
        )));
    }

    let like = LikeRepo::create(&state.pool, from_user_id, to_user_id).await?;
    tracing::info!(like_id = like.id, from_user_id, to_user_id, "Like created");

    let matched = match_if_mutual(&state.pool, from_user_id, to_user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: LikeCreated { like, matched },
        }),
    ))
}

/// GET /api/v1/likes
pub async fn list_likes(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<UserLike>>>> {
    let likes = LikeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: likes }))
}

/// GET /api/v1/likes/recent?hours=24
pub async fn recent_likes(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<RecentParams>,
) -> AppResult<Json<DataResponse<Vec<UserLike>>>> {
    let hours = params.hours.unwrap_or(DEFAULT_RECENT_HOURS);
    validate_recent_hours(hours)?;
    let since = Utc::now() - chrono::Duration::hours(hours);
    let likes = LikeRepo::list_since(&state.pool, since).await?;
    Ok(Json(DataResponse { data: likes }))
}

/// GET /api/v1/likes/{id}
pub async fn get_like(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserLike>>> {
    let like = LikeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: like }))
}

/// DELETE /api/v1/likes/{id}
pub async fn delete_like(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if LikeRepo::delete(&state.pool, id).await? {
        tracing::info!(like_id = id, "Like deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// DELETE /api/v1/likes/to/{user_id}
///
/// Withdraw the caller's like of `user_id`. An existing match is kept.
pub async fn unlike_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if LikeRepo::delete_between(&state.pool, auth.user_id, user_id).await? {
        tracing::info!(from_user_id = auth.user_id, to_user_id = user_id, "Like withdrawn");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Like to user",
            id: user_id,
        }))
    }
}

/// GET /api/v1/users/{id}/likes/sent
pub async fn likes_sent(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<UserLike>>>> {
    let likes = LikeRepo::list_from_user(&state.pool, user_id).await?;
    Ok(Json(DataResponse { data: likes }))
}

/// GET /api/v1/users/{id}/likes/received
pub async fn likes_received(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<UserLike>>>> {
    let likes = LikeRepo::list_to_user(&state.pool, user_id).await?;
    Ok(Json(DataResponse { data: likes }))
}

/// GET /api/v1/users/{id}/likes/mutual
pub async fn mutual_likes(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<LikedUser>>>> {
    let users = LikeRepo::list_mutual(&state.pool, user_id).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/users/{id}/likes/potential?limit=20
///
/// Users who liked `id` and have not been liked back.
pub async fn potential_matches(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<DbId>,
    Query(params): Query<PotentialParams>,
) -> AppResult<Json<DataResponse<Vec<LikedUser>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_POTENTIAL_LIMIT);
    validate_potential_limit(limit)?;
    let users = LikeRepo::list_potential(&state.pool, user_id, limit).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/users/{id}/likes/stats
pub async fn like_stats(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<LikeStats>>> {
    let likes_sent = LikeRepo::count_from_user(&state.pool, user_id).await?;
    let likes_received = LikeRepo::count_to_user(&state.pool, user_id).await?;
    let mutual_likes = LikeRepo::list_mutual(&state.pool, user_id).await?.len() as i64;
    let potential_matches = likes_received - mutual_likes;

    Ok(Json(DataResponse {
        data: LikeStats {
            likes_sent,
            likes_received,
            mutual_likes,
            potential_matches,
        },
    }))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Like",
        id,
    })
}
