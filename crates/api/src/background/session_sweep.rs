//! Periodic deletion of expired user sessions.
//!
//! Expired rows can never authenticate again; this keeps `user_sessions`
//! from growing without bound. Runs on a fixed interval using
//! `tokio::time::interval`.

use std::time::Duration;

use amora_db::repositories::SessionRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Run the sweep loop until `cancel` is triggered.
///
/// The first sweep happens immediately.
pub async fn run(pool: PgPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Expired session sweep started"
    );

    let mut interval = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Expired session sweep stopping");
                break;
            }
            _ = interval.tick() => {
                match SessionRepo::delete_expired(&pool).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Session sweep: purged expired sessions");
                        } else {
                            tracing::debug!("Session sweep: nothing to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Session sweep: cleanup failed");
                    }
                }
            }
        }
    }
}
