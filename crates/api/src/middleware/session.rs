//! Session-relevant request data, extracted without ever rejecting.

use std::convert::Infallible;

use amora_core::fingerprint::FingerprintComponents;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::auth::cookie::token_from_headers;
use crate::auth::fingerprint::components_from_headers;

/// Everything the session manager needs from an incoming request.
#[derive(Debug, Clone)]
pub struct SessionRequest {
    /// Value of the `session_token` cookie, if present and non-empty.
    pub token: Option<String>,
    pub fingerprint: FingerprintComponents,
    pub fingerprint_hash: String,
    pub client_ip: Option<String>,
}

impl SessionRequest {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let fingerprint = components_from_headers(headers);
        let fingerprint_hash = fingerprint.hash();
        Self {
            token: token_from_headers(headers),
            fingerprint,
            fingerprint_hash,
            client_ip: client_ip(headers),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SessionRequest {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// Client address as reported by the reverse proxy.
///
/// First entry of `X-Forwarded-For`, else `X-Real-IP`.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    forwarded
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .map(str::to_string)
}
