pub mod auth;
pub mod health;
pub mod likes;
pub mod matches;
pub mod user_sessions;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/session                               establish or refresh (public)
/// /auth/current-user                          current identity
/// /auth/logout                                revoke and clear cookie (public)
/// /auth/session/validate                      validity check (public)
/// /auth/session/refresh                       rotate token
/// /auth/session/info                          current session details
/// /auth/sessions/others                       revoke other browsers (DELETE)
/// /auth/fingerprint                           fingerprint debug (public)
///
/// /users                                      list, create
/// /users/authenticate                         check credentials (public)
/// /users/stats/active-count                   active users, last 30 days
/// /users/activity                             users active in a range
/// /users/{id}                                 get, update, delete
/// /users/{id}/sessions                        sessions of a user
/// /users/{id}/sessions/active                 active sessions of a user
/// /users/{id}/sessions/deactivate-all         deactivate all (PATCH)
/// /users/{id}/likes/{sent,received,mutual}    likes around a user
/// /users/{id}/likes/potential                 liked by others, not back
/// /users/{id}/likes/stats                     like counters
/// /users/{id}/matches                         matches of a user (?status=)
/// /users/{id}/matches/stats                   match counters of a user
///
/// /user-sessions                              list
/// /user-sessions/cleanup-expired              purge expired (POST)
/// /user-sessions/token/{token_hash}           lookup by token hash
/// /user-sessions/ip/{ip}                      lookup by client IP
/// /user-sessions/validate/{token_hash}        validity by token hash
/// /user-sessions/{id}                         get, delete
/// /user-sessions/{id}/extend                  extend expiry (PATCH)
/// /user-sessions/{id}/deactivate              deactivate (PATCH)
///
/// /likes                                      list, like someone (POST)
/// /likes/recent                               likes in the last N hours
/// /likes/to/{user_id}                         withdraw own like (DELETE)
/// /likes/{id}                                 get, delete
///
/// /matches                                    list
/// /matches/recent                             matches in the last N hours
/// /matches/stats                              counters by status
/// /matches/from-likes                         match with a mutual liker (POST)
/// /matches/end-inactive                       end stale matches (POST)
/// /matches/{id}                               get, delete
/// /matches/{id}/status                        change status (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Browser session lifecycle.
        .nest("/auth", auth::router())
        // User management.
        .merge(users::router())
        // Session management.
        .merge(user_sessions::router())
        // Likes and matches.
        .merge(likes::router())
        .merge(matches::router())
}
