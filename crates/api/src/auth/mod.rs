//! Session authentication primitives.
//!
//! - [`fingerprint`] -- browser fingerprint derived from request headers.
//! - [`token`] -- RS256 session token encoding and verification.
//! - [`cookie`] -- `session_token` cookie transport.
//! - [`store`] -- persistence seam for sessions and users.
//! - [`session`] -- the session manager composing all of the above.
//! - [`password`] -- Argon2id password hashing and verification.

pub mod cookie;
pub mod error;
pub mod fingerprint;
pub mod password;
pub mod session;
pub mod store;
pub mod token;

pub use error::AuthError;
