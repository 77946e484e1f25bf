//! Credential hashing and verification using Argon2.
//!
//! Uses the argon2id variant with default parameters. Only the PHC-formatted
//! hash is ever stored; the raw secret is dropped after hashing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::types::{PantryError, Result};

/// Hash a raw secret with a fresh salt.
///
/// Returns the PHC-formatted string that embeds the salt and parameters.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PantryError::Authentication(format!("failed to hash password: {e}")))
}

/// Verify a raw secret against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PantryError::Authentication(format!("invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let password = "sea-salt-and-thyme";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("wrong-secret", &hash).unwrap());
    }

    #[test]
    fn same_secret_different_salts() {
        let password = "same-secret";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    #[test]
    fn invalid_hash_format_is_an_error() {
        assert!(verify_password("password", "not-a-valid-hash").is_err());
    }
}
