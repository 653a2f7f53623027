//! Reset-token signing and hashing.
//!
//! The token the user receives is a short-lived HS256 JWT. The database
//! stores only its SHA-256, which makes tokens revocable (consume the row)
//! without making the stored value replayable.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use optima_core::ids::ResetTokenId;

use crate::errors::{AuthError, Result};

/// Claims carried by a reset token.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetClaims {
    /// User ID the token was issued for.
    pub sub: String,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Unique token ID, so two tokens for one user hash differently.
    pub jti: String,
}

/// Sign a reset token for `user_id` expiring after `ttl_minutes`.
pub fn sign_reset_token(
    secret: &str,
    user_id: &str,
    ttl_minutes: i64,
) -> Result<(String, DateTime<Utc>)> {
    let expires_at = Utc::now() + Duration::minutes(ttl_minutes);
    let claims = ResetClaims {
        sub: user_id.to_owned(),
        exp: expires_at.timestamp(),
        jti: ResetTokenId::generate().into(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok((token, expires_at))
}

/// Decode and validate a reset token. Any failure (signature, shape,
/// expiry) collapses to [`AuthError::InvalidToken`].
pub fn decode_reset_token(secret: &str, token: &str) -> Result<ResetClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    decode::<ResetClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}

/// SHA-256 hex of the full token string, the value stored at rest.
#[must_use]
pub fn token_hash(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let mut out = String::with_capacity(64);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SECRET: &str = "test-secret";

    #[test]
    fn sign_and_decode_round_trip() {
        let (token, expires_at) = sign_reset_token(SECRET, "usr_1", 60).unwrap();
        let claims = decode_reset_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, "usr_1");
        assert_eq!(claims.exp, expires_at.timestamp());
        assert!(claims.jti.starts_with("rst_"));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let (token, _) = sign_reset_token(SECRET, "usr_1", 60).unwrap();
        let err = decode_reset_token("other-secret", &token).unwrap_err();
        assert_matches!(err, AuthError::InvalidToken);
    }

    #[test]
    fn expired_token_is_invalid() {
        let (token, _) = sign_reset_token(SECRET, "usr_1", -1).unwrap();
        let err = decode_reset_token(SECRET, &token).unwrap_err();
        assert_matches!(err, AuthError::InvalidToken);
    }

    #[test]
    fn garbage_is_invalid() {
        assert_matches!(
            decode_reset_token(SECRET, "not.a.jwt").unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn two_tokens_for_one_user_hash_differently() {
        let (a, _) = sign_reset_token(SECRET, "usr_1", 60).unwrap();
        let (b, _) = sign_reset_token(SECRET, "usr_1", 60).unwrap();
        assert_ne!(token_hash(&a), token_hash(&b));
    }

    #[test]
    fn token_hash_is_hex_sha256() {
        let hash = token_hash("abc");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
