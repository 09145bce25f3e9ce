//! `session_token` cookie transport.
//!
//! The cookie is always `HttpOnly; Secure; SameSite=Lax` and scoped to `/`.

use axum::http::header::COOKIE;
use axum::http::{HeaderMap, HeaderValue};

use crate::auth::error::AuthError;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "session_token";

/// `Set-Cookie` value that removes the session cookie from the browser.
const CLEARED_COOKIE: &str = "session_token=; Path=/; Max-Age=0; HttpOnly; Secure; SameSite=Lax";

/// Extract the session token from the request's `Cookie` header(s).
///
/// Returns `None` when the cookie is absent or empty.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// Build the `Set-Cookie` value carrying `token` for `max_age_secs` seconds.
pub fn session_cookie(token: &str, max_age_secs: i64) -> Result<HeaderValue, AuthError> {
    let cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; Max-Age={max_age_secs}; HttpOnly; Secure; SameSite=Lax"
    );
    HeaderValue::from_str(&cookie)
        .map_err(|e| AuthError::Internal(format!("Invalid session cookie value: {e}")))
}

/// Build the `Set-Cookie` value that clears the session cookie.
pub fn cleared_session_cookie() -> HeaderValue {
    HeaderValue::from_static(CLEARED_COOKIE)
}
