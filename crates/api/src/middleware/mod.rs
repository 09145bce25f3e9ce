//! Request extractors for session-based authentication.
//!
//! - [`session::SessionRequest`] -- cookie token, fingerprint and client IP of a request.
//! - [`auth::AuthUser`] -- the verified session of the caller; rejects with 401.

pub mod auth;
pub mod session;
