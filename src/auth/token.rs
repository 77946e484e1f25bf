//! Account confirmation tokens.
//!
//! A confirmation token is a signed, time-limited proof binding a user's
//! public id. Verification fails closed: tampering, expiry, or a malformed
//! token all yield nothing, never a partial claim.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::types::{PantryError, Result};

#[derive(Debug, Serialize, Deserialize)]
struct ConfirmClaims {
    /// Public id of the user this token confirms.
    confirm: i64,
    /// Expiry as a unix timestamp.
    exp: u64,
}

/// Signs and verifies confirmation tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a confirmation token for `user_id`, valid for `ttl_seconds`.
    pub fn issue_confirmation(&self, user_id: i64, ttl_seconds: u64) -> Result<String> {
        let claims = ConfirmClaims {
            confirm: user_id,
            exp: unix_now() + ttl_seconds,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| PantryError::Token(format!("failed to sign token: {e}")))
    }

    /// Verify a confirmation token and return the user id it is bound to.
    ///
    /// Returns None on tamper, expiry, or wrong shape. Expiry is exact: no
    /// clock leeway is granted.
    pub fn verify_confirmation(&self, token: &str) -> Option<i64> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<ConfirmClaims>(token, &self.decoding, &validation)
            .ok()
            .map(|data| data.claims.confirm)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_and_verify_binds_the_id() {
        let signer = TokenSigner::new("test-secret");
        let token = signer.issue_confirmation(42, 3600).unwrap();

        assert_eq!(signer.verify_confirmation(&token), Some(42));
    }

    #[test]
    fn tampered_token_fails() {
        let signer = TokenSigner::new("test-secret");
        let token = signer.issue_confirmation(42, 3600).unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert_eq!(signer.verify_confirmation(&tampered), None);
    }

    #[test]
    fn wrong_secret_fails() {
        let signer = TokenSigner::new("test-secret");
        let other = TokenSigner::new("other-secret");
        let token = signer.issue_confirmation(42, 3600).unwrap();

        assert_eq!(other.verify_confirmation(&token), None);
    }

    #[test]
    fn expired_token_fails() {
        let signer = TokenSigner::new("test-secret");

        // Sign a claim that expired a minute ago.
        let claims = ConfirmClaims {
            confirm: 7,
            exp: unix_now() - 60,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(signer.verify_confirmation(&token), None);
    }
}
