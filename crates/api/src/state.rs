use std::sync::Arc;

use crate::auth::session::SessionManager;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: amora_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Session lifecycle (token codec plus session store).
    pub sessions: Arc<SessionManager>,
}
