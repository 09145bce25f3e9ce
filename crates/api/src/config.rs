use std::path::PathBuf;

use chrono::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long background tasks get to stop after shutdown starts (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Session token and cookie settings.
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let session = SessionConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            session,
        }
    }
}

/// Session token configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// PEM file holding the RSA private key used to sign tokens.
    pub private_key_path: PathBuf,
    /// PEM file holding the RSA public key used to verify tokens.
    pub public_key_path: PathBuf,
    /// Token and cookie lifetime in days (default: `30`).
    pub ttl_days: i64,
    /// Interval between expired-session sweeps in seconds (default: `3600`).
    pub sweep_interval_secs: u64,
}

impl SessionConfig {
    /// | Env Var                       | Default                |
    /// |-------------------------------|------------------------|
    /// | `JWT_PRIVATE_KEY_PATH`        | `keys/jwt-private.pem` |
    /// | `JWT_PUBLIC_KEY_PATH`         | `keys/jwt-public.pem`  |
    /// | `SESSION_TTL_DAYS`            | `30`                   |
    /// | `SESSION_SWEEP_INTERVAL_SECS` | `3600`                 |
    pub fn from_env() -> Self {
        let private_key_path = std::env::var("JWT_PRIVATE_KEY_PATH")
            .unwrap_or_else(|_| "keys/jwt-private.pem".into())
            .into();
        let public_key_path = std::env::var("JWT_PUBLIC_KEY_PATH")
            .unwrap_or_else(|_| "keys/jwt-public.pem".into())
            .into();

        let ttl_days: i64 = std::env::var("SESSION_TTL_DAYS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SESSION_TTL_DAYS must be a valid i64");
        assert!(ttl_days > 0, "SESSION_TTL_DAYS must be positive");

        let sweep_interval_secs: u64 = std::env::var("SESSION_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("SESSION_SWEEP_INTERVAL_SECS must be a valid u64");
        assert!(
            sweep_interval_secs > 0,
            "SESSION_SWEEP_INTERVAL_SECS must be positive"
        );

        Self {
            private_key_path,
            public_key_path,
            ttl_days,
            sweep_interval_secs,
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::days(self.ttl_days)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blanks_dropped() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn ttl_is_whole_days() {
        let config = SessionConfig {
            private_key_path: "k".into(),
            public_key_path: "k".into(),
            ttl_days: 30,
            sweep_interval_secs: 3600,
        };
        assert_eq!(config.ttl().num_seconds(), 2_592_000);
    }
}
