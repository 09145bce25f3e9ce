//! Domain primitives shared by the database and API crates.

pub mod error;
pub mod fingerprint;
pub mod hashing;
pub mod matching;
pub mod types;
pub mod validation;
