//! Session token codec.
//!
//! Session tokens are RS256-signed JWTs carrying a [`SessionClaims`] payload
//! that binds a user, a browser fingerprint, and a server-side session row.
//! Signing needs the private key; verification only ever uses the public key.
//!
//! Decoding a token proves it was issued by us and has not expired. It does
//! NOT prove the session is still alive; see
//! [`SessionManager`](crate::auth::session::SessionManager) for that.

use std::fmt;
use std::path::{Path, PathBuf};

use amora_core::hashing::sha256_hex;
use amora_core::types::DbId;
use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::error::AuthError;

/// Discriminator embedded in every session token.
pub const TOKEN_TYPE: &str = "user_session";

/// Claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: DbId,
    /// Hex SHA-256 of the browser fingerprint the token was issued to.
    pub fingerprint_hash: String,
    pub session_id: DbId,
    /// Random per-token id, so two tokens minted for the same session in the
    /// same second still differ (and hash differently).
    pub jti: String,
    /// Always [`TOKEN_TYPE`].
    pub token_type: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Failure to load signing or verification key material.
#[derive(Debug, thiserror::Error)]
pub enum KeyLoadError {
    #[error("{kind} key file not found at {}", .path.display())]
    NotFound { kind: &'static str, path: PathBuf },

    #[error("Error reading {kind} key file {}: {source}", .path.display())]
    Io {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {kind} key PEM: {source}")]
    Pem {
        kind: &'static str,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
}

/// Signs and verifies session tokens.
///
/// Built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::RS256)
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec from PEM-encoded RSA keys.
    ///
    /// The private key may be PKCS#1 or PKCS#8; the public key is SPKI or PKCS#1.
    pub fn from_pem(
        private_pem: &[u8],
        public_pem: &[u8],
        ttl: Duration,
    ) -> Result<Self, KeyLoadError> {
        let encoding = EncodingKey::from_rsa_pem(private_pem).map_err(|source| {
            KeyLoadError::Pem {
                kind: "private",
                source,
            }
        })?;
        let decoding = DecodingKey::from_rsa_pem(public_pem).map_err(|source| {
            KeyLoadError::Pem {
                kind: "public",
                source,
            }
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        // `exp` is authoritative: a token is expired the second it passes.
        validation.leeway = 0;

        Ok(Self {
            encoding,
            decoding,
            validation,
            ttl,
        })
    }

    /// Build a codec from PEM files on disk.
    pub fn from_pem_files(
        private_key_path: &Path,
        public_key_path: &Path,
        ttl: Duration,
    ) -> Result<Self, KeyLoadError> {
        let private_pem = read_key_file(private_key_path, "private")?;
        let public_pem = read_key_file(public_key_path, "public")?;
        Self::from_pem(&private_pem, &public_pem, ttl)
    }

    /// Lifetime of freshly issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for the given session binding, valid for [`Self::ttl`].
    pub fn encode(
        &self,
        user_id: DbId,
        fingerprint_hash: &str,
        session_id: DbId,
    ) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            user_id,
            fingerprint_hash: fingerprint_hash.to_string(),
            session_id,
            jti: uuid::Uuid::new_v4().simple().to_string(),
            token_type: TOKEN_TYPE.to_string(),
            exp: now + self.ttl.num_seconds(),
            iat: now,
        };
        self.sign(&claims)
    }

    pub(crate) fn sign(&self, claims: &SessionClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::RS256), claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("Token signing error: {e}")))
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// Fails with [`AuthError::TokenExpired`] once `exp` has passed and with
    /// [`AuthError::TokenInvalid`] for anything that does not verify or parse.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let data =
            decode::<SessionClaims>(token, &self.decoding, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::TokenInvalid,
                }
            })?;

        if data.claims.token_type != TOKEN_TYPE {
            return Err(AuthError::TokenInvalid);
        }
        Ok(data.claims)
    }
}

/// SHA-256 hex digest of a token, as stored in `user_sessions.jwt_token_hash`.
pub fn hash_token(token: &str) -> String {
    sha256_hex(token.as_bytes())
}

fn read_key_file(path: &Path, kind: &'static str) -> Result<Vec<u8>, KeyLoadError> {
    std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            KeyLoadError::NotFound {
                kind,
                path: path.to_path_buf(),
            }
        } else {
            KeyLoadError::Io {
                kind,
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const PRIVATE_PEM: &[u8] = include_bytes!("../../tests/fixtures/jwt-private.pem");
    const PUBLIC_PEM: &[u8] = include_bytes!("../../tests/fixtures/jwt-public.pem");
    const OTHER_PUBLIC_PEM: &[u8] = include_bytes!("../../tests/fixtures/other-public.pem");

    /// Codec over the checked-in test key pair with a 30-day TTL.
    pub(crate) fn test_codec() -> TokenCodec {
        TokenCodec::from_pem(PRIVATE_PEM, PUBLIC_PEM, Duration::days(30))
            .expect("test keys should load")
    }

    /// Replace one character in the middle of the signature segment.
    fn tamper_signature(token: &str) -> String {
        let sig_start = token.rfind('.').expect("JWT has three segments") + 1;
        let mut bytes = token.as_bytes().to_vec();
        let i = sig_start + 10;
        bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
        String::from_utf8(bytes).expect("still ASCII")
    }

    #[test]
    fn test_encode_and_decode_round_trip() {
        let codec = test_codec();
        let token = codec.encode(42, "abc123", 7).expect("encode should succeed");

        let claims = codec.decode(&token).expect("decode should succeed");
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.session_id, 7);
        assert_eq!(claims.fingerprint_hash, "abc123");
        assert_eq!(claims.token_type, TOKEN_TYPE);
        assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
    }

    #[test]
    fn test_tokens_for_same_session_are_unique() {
        let codec = test_codec();
        let first = codec.encode(42, "abc123", 7).unwrap();
        let second = codec.encode(42, "abc123", 7).unwrap();

        assert_ne!(first, second);
        assert_ne!(hash_token(&first), hash_token(&second));
        assert_ne!(
            codec.decode(&first).unwrap().jti,
            codec.decode(&second).unwrap().jti
        );
    }

    #[test]
    fn test_expired_token_fails() {
        let codec = test_codec();
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            user_id: 1,
            fingerprint_hash: "fp".to_string(),
            session_id: 1,
            jti: "test-jti".to_string(),
            token_type: TOKEN_TYPE.to_string(),
            exp: now - 5,
            iat: now - 100,
        };
        let token = codec.sign(&claims).expect("signing should succeed");

        assert_matches!(codec.decode(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_tampered_signature_fails() {
        let codec = test_codec();
        let token = codec.encode(1, "fp", 1).unwrap();
        let tampered = tamper_signature(&token);
        assert_ne!(token, tampered);

        assert_matches!(codec.decode(&tampered), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_token_from_other_key_fails() {
        let issuer = test_codec();
        let verifier =
            TokenCodec::from_pem(PRIVATE_PEM, OTHER_PUBLIC_PEM, Duration::days(30)).unwrap();
        let token = issuer.encode(1, "fp", 1).unwrap();

        assert_matches!(verifier.decode(&token), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_garbage_fails() {
        let codec = test_codec();
        assert_matches!(codec.decode(""), Err(AuthError::TokenInvalid));
        assert_matches!(codec.decode("not.a.jwt"), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_wrong_token_type_fails() {
        let codec = test_codec();
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            user_id: 1,
            fingerprint_hash: "fp".to_string(),
            session_id: 1,
            jti: "test-jti".to_string(),
            token_type: "access".to_string(),
            exp: now + 60,
            iat: now,
        };
        let token = codec.sign(&claims).unwrap();

        assert_matches!(codec.decode(&token), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_hash_token_is_sha256_hex() {
        let hash = hash_token("some.jwt.value");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_token("some.jwt.value"));
        assert_ne!(hash, hash_token("some.jwt.other"));
    }

    #[test]
    fn test_missing_key_file() {
        let result = TokenCodec::from_pem_files(
            Path::new("/nonexistent/jwt-private.pem"),
            Path::new("/nonexistent/jwt-public.pem"),
            Duration::days(30),
        );
        assert_matches!(result, Err(KeyLoadError::NotFound { kind: "private", .. }));
    }

    #[test]
    fn test_invalid_pem_rejected() {
        let result = TokenCodec::from_pem(b"not a key", PUBLIC_PEM, Duration::days(30));
        assert_matches!(result, Err(KeyLoadError::Pem { kind: "private", .. }));
    }
}
