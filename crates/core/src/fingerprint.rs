//! Browser fingerprinting.
//!
//! A fingerprint is a stable pseudo-identifier for a client derived from a
//! handful of request headers. It is never persisted on its own; only its
//! hash is stored on session rows and embedded in session tokens.

use serde::Serialize;

use crate::hashing::sha256_hex;

/// Delimiter placed between header values before hashing.
pub const FINGERPRINT_DELIMITER: &str = "|";

/// The raw header values a fingerprint is computed from.
///
/// Missing headers are represented as empty strings, which lowers the
/// specificity of the fingerprint but never makes it fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FingerprintComponents {
    pub user_agent: String,
    pub accept_language: String,
    pub accept_encoding: String,
}

impl FingerprintComponents {
    pub fn new(
        user_agent: impl Into<String>,
        accept_language: impl Into<String>,
        accept_encoding: impl Into<String>,
    ) -> Self {
        Self {
            user_agent: user_agent.into(),
            accept_language: accept_language.into(),
            accept_encoding: accept_encoding.into(),
        }
    }

    /// Hex-encoded SHA-256 of `user_agent|accept_language|accept_encoding`.
    pub fn hash(&self) -> String {
        let joined = [
            self.user_agent.as_str(),
            self.accept_language.as_str(),
            self.accept_encoding.as_str(),
        ]
        .join(FINGERPRINT_DELIMITER);
        sha256_hex(joined.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_matches_known_digest() {
        let components = FingerprintComponents::new("A", "en", "gzip");
        assert_eq!(
            components.hash(),
            "ebf2c72b6d9d4e2b04e4ec746f94701e0352f17cca4e9f096b329a7fc9d58e0d"
        );
    }

    #[test]
    fn hash_is_stable_across_calls() {
        let components = FingerprintComponents::new("Mozilla/5.0", "en-US,en;q=0.9", "gzip, br");
        let first = components.hash();
        for _ in 0..10 {
            assert_eq!(components.hash(), first);
        }
        assert_eq!(first, components.clone().hash());
    }

    #[test]
    fn missing_headers_still_hash() {
        let components = FingerprintComponents::default();
        assert_eq!(
            components.hash(),
            "565d240f5343e625ae579a4d45a770f1f02c6368b5ed4d06da4fbe6f47c28866"
        );
    }

    #[test]
    fn any_component_changes_the_hash() {
        let base = FingerprintComponents::new("A", "en", "gzip");
        assert_ne!(base.hash(), FingerprintComponents::new("B", "en", "gzip").hash());
        assert_ne!(base.hash(), FingerprintComponents::new("A", "de", "gzip").hash());
        assert_ne!(base.hash(), FingerprintComponents::new("A", "en", "br").hash());
    }
}
