//! Route definitions for the `/likes` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::likes;
use crate::state::AppState;

/// Routes for `/likes`. All require a session (any guest session qualifies);
/// the liker is always the session's user.
///
/// ```text
/// GET    /likes                  -> list_likes
/// POST   /likes                  -> create_like
/// GET    /likes/recent?hours=    -> recent_likes
/// DELETE /likes/to/{user_id}     -> unlike_user
/// GET    /likes/{id}             -> get_like
/// DELETE /likes/{id}             -> delete_like
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/likes", get(likes::list_likes).post(likes::create_like))
        .route("/likes/recent", get(likes::recent_likes))
        .route("/likes/to/{user_id}", delete(likes::unlike_user))
        .route(
            "/likes/{id}",
            get(likes::get_like).delete(likes::delete_like),
        )
}
