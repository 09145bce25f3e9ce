//! Failure taxonomy of the session component.

/// Why a session could not be established, authenticated, or refreshed.
///
/// Every variant except [`AuthError::Store`] and [`AuthError::Internal`] is an
/// unauthorized-class failure; the display string is the reason reported to
/// the client.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No session token")]
    MissingToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Device fingerprint mismatch")]
    FingerprintMismatch,

    #[error("Session revoked or inactive")]
    SessionInactiveOrMissing,

    #[error("Session store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Internal auth error: {0}")]
    Internal(String),
}

impl AuthError {
    /// `true` for failures caused by the presented credentials rather than the server.
    pub fn is_unauthorized(&self) -> bool {
        !matches!(self, AuthError::Store(_) | AuthError::Internal(_))
    }
}
