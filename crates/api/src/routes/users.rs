//! Route definitions for the `/users` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{likes, matches, user_sessions, users};
use crate::state::AppState;

/// Routes for `/users`, including the per-user session routes.
///
/// All routes except `POST /users/authenticate` require a session. A guest
/// session is enough and no ownership check is made, so these routes are
/// effectively open to any browser (see [`AuthUser`](crate::middleware::auth::AuthUser)).
///
/// ```text
/// GET    /users                                  -> list_users
/// POST   /users                                  -> create_user
/// POST   /users/authenticate                     -> authenticate (public)
/// GET    /users/stats/active-count               -> active_count
/// GET    /users/activity?start=&end=             -> activity
/// GET    /users/{id}                             -> get_user
/// PUT    /users/{id}                             -> update_user
/// DELETE /users/{id}                             -> delete_user
/// GET    /users/{id}/sessions                    -> list_user_sessions
/// GET    /users/{id}/sessions/active             -> list_active_user_sessions
/// PATCH  /users/{id}/sessions/deactivate-all     -> deactivate_user_sessions
/// GET    /users/{id}/likes/sent                  -> likes_sent
/// GET    /users/{id}/likes/received              -> likes_received
/// GET    /users/{id}/likes/mutual                -> mutual_likes
/// GET    /users/{id}/likes/potential?limit=      -> potential_matches
/// GET    /users/{id}/likes/stats                 -> like_stats
/// GET    /users/{id}/matches?status=             -> user_matches
/// GET    /users/{id}/matches/stats               -> user_match_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/authenticate", post(users::authenticate))
        .route("/users/stats/active-count", get(users::active_count))
        .route("/users/activity", get(users::activity))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/users/{id}/sessions",
            get(user_sessions::list_user_sessions),
        )
        .route(
            "/users/{id}/sessions/active",
            get(user_sessions::list_active_user_sessions),
        )
        .route(
            "/users/{id}/sessions/deactivate-all",
            patch(user_sessions::deactivate_user_sessions),
        )
        .route("/users/{id}/likes/sent", get(likes::likes_sent))
        .route("/users/{id}/likes/received", get(likes::likes_received))
        .route("/users/{id}/likes/mutual", get(likes::mutual_likes))
        .route("/users/{id}/likes/potential", get(likes::potential_matches))
        .route("/users/{id}/likes/stats", get(likes::like_stats))
        .route("/users/{id}/matches", get(matches::user_matches))
        .route("/users/{id}/matches/stats", get(matches::user_match_stats))
}
