//! Handlers for the `/users` resource.
//!
//! Every handler except [`authenticate`] requires a valid session.

use amora_core::error::CoreError;
use amora_core::types::{DbId, Timestamp};
use amora_core::validation::{validate_email, validate_first_name, MIN_PASSWORD_LEN};
use amora_db::models::user::{CreateUser, UpdateUser, UserResponse};
use amora_db::repositories::UserRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Window used by `GET /users/stats/active-count`.
const ACTIVE_WINDOW_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
}

/// Request body for `PUT /users/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
}

/// Request body for `POST /users/authenticate`.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Query string for `GET /users/activity`.
#[derive(Debug, Deserialize)]
pub struct ActivityRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Body of `GET /users/stats/active-count`.
#[derive(Debug, Serialize)]
pub struct ActiveUserCount {
    pub active_users: i64,
    pub window_days: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    validate_email(&input.email).map_err(validation)?;
    validate_first_name(&input.first_name).map_err(validation)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LEN).map_err(validation)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create_dto = CreateUser {
        email: input.email.trim().to_string(),
        password_hash,
        first_name: input.first_name.trim().to_string(),
    };
    let user = UserRepo::create(&state.pool, &create_dto).await?;
    tracing::info!(user_id = user.id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(&user),
        }),
    ))
}

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// PUT /api/v1/users/{id}
///
/// Partial update. At least one field must be present.
pub async fn update_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if let Some(email) = &input.email {
        validate_email(email).map_err(validation)?;
    }
    if let Some(first_name) = &input.first_name {
        validate_first_name(first_name).map_err(validation)?;
    }
    let password_hash = match &input.password {
        Some(password) => {
            validate_password_strength(password, MIN_PASSWORD_LEN).map_err(validation)?;
            Some(
                hash_password(password)
                    .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?,
            )
        }
        None => None,
    };

    let update_dto = UpdateUser {
        email: input.email.map(|e| e.trim().to_string()),
        password_hash,
        first_name: input.first_name.map(|n| n.trim().to_string()),
    };
    if update_dto.is_empty() {
        return Err(AppError::BadRequest("No valid fields to update".into()));
    }

    let user = UserRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// DELETE /api/v1/users/{id}
///
/// Hard-delete a user and, by cascade, their sessions. Returns 204 No Content.
pub async fn delete_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if UserRepo::delete(&state.pool, id).await? {
        tracing::info!(user_id = id, "User deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}

/// POST /api/v1/users/authenticate
///
/// Check an email/password pair. Public.
pub async fn authenticate(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    UserRepo::touch_activity(&state.pool, user.id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// GET /api/v1/users/stats/active-count
pub async fn active_count(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<ActiveUserCount>>> {
    let since = Utc::now() - chrono::Duration::days(ACTIVE_WINDOW_DAYS);
    let active_users = UserRepo::count_active_since(&state.pool, since).await?;
    Ok(Json(DataResponse {
        data: ActiveUserCount {
            active_users,
            window_days: ACTIVE_WINDOW_DAYS,
        },
    }))
}

/// GET /api/v1/users/activity?start=..&end=..
pub async fn activity(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(range): Query<ActivityRange>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    if range.start > range.end {
        return Err(AppError::BadRequest("start must not be after end".into()));
    }
    let users = UserRepo::list_active_between(&state.pool, range.start, range.end).await?;
    Ok(Json(DataResponse {
        data: users.iter().map(UserResponse::from).collect(),
    }))
}

fn validation(msg: String) -> AppError {
    AppError::Core(CoreError::Validation(msg))
}
