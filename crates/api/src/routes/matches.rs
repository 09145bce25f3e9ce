//! Route definitions for the `/matches` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::matches;
use crate::state::AppState;

/// Routes for `/matches`. All require a session, but any guest session
/// qualifies, so they are effectively open to any browser.
///
/// ```text
/// GET    /matches                -> list_matches
/// GET    /matches/recent?hours=  -> recent_matches
/// GET    /matches/stats          -> match_counts
/// POST   /matches/from-likes     -> create_from_likes
/// POST   /matches/end-inactive   -> end_inactive_matches
/// GET    /matches/{id}           -> get_match
/// DELETE /matches/{id}           -> delete_match
/// PATCH  /matches/{id}/status    -> update_match_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/matches", get(matches::list_matches))
        .route("/matches/recent", get(matches::recent_matches))
        .route("/matches/stats", get(matches::match_counts))
        .route("/matches/from-likes", post(matches::create_from_likes))
        .route("/matches/end-inactive", post(matches::end_inactive_matches))
        .route(
            "/matches/{id}",
            get(matches::get_match).delete(matches::delete_match),
        )
        .route("/matches/{id}/status", patch(matches::update_match_status))
}
