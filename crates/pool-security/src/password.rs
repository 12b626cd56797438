//! Password hashing and verification.
//!
//! Stored hashes are self-describing: PHC argon2 strings (`$argon2id$...`) and
//! bcrypt strings (`$2a$`, `$2b$`, `$2y$`) are both accepted, so records
//! provisioned by either tool verify without a migration.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
    #[error("Unsupported hash format")]
    UnsupportedFormat,
}

/// Checks a plaintext password against a stored hash.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordService;

impl PasswordService {
    /// Argon2id hash with a fresh random salt.
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    pub fn hash_bcrypt(password: &str, cost: u32) -> Result<String, PasswordError> {
        bcrypt::hash(password, cost).map_err(|e| PasswordError::HashError(e.to_string()))
    }

    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        match HashScheme::detect(hash) {
            Some(HashScheme::Argon2) => {
                let parsed_hash = PasswordHash::new(hash)
                    .map_err(|e| PasswordError::HashError(e.to_string()))?;
                Ok(Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok())
            }
            Some(HashScheme::Bcrypt) => {
                bcrypt::verify(password, hash).map_err(|e| PasswordError::HashError(e.to_string()))
            }
            None => Err(PasswordError::UnsupportedFormat),
        }
    }
}

impl CredentialVerifier for PasswordService {
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        PasswordService::verify(password, stored_hash)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HashScheme {
    Argon2,
    Bcrypt,
}

impl HashScheme {
    fn detect(hash: &str) -> Option<Self> {
        if hash.starts_with("$argon2") {
            Some(HashScheme::Argon2)
        } else if ["$2a$", "$2b$", "$2y$"].iter().any(|p| hash.starts_with(p)) {
            Some(HashScheme::Bcrypt)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argon2_round_trip() {
        let hash = PasswordService::hash("havuz-2024").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(PasswordService::verify("havuz-2024", &hash).unwrap());
        assert!(!PasswordService::verify("wrong", &hash).unwrap());
    }

    #[test]
    fn test_bcrypt_hashes_are_accepted() {
        let hash = PasswordService::hash_bcrypt("secret", 4).unwrap();
        assert!(PasswordService::verify("secret", &hash).unwrap());
        assert!(!PasswordService::verify("Secret", &hash).unwrap());
    }

    #[test]
    fn test_unknown_scheme_is_an_error() {
        let result = PasswordService::verify("secret", "pbkdf2_sha256$600000$salt$abc");
        assert!(matches!(result, Err(PasswordError::UnsupportedFormat)));
    }

    #[test]
    fn test_malformed_argon2_string_is_an_error() {
        let result = PasswordService::verify("secret", "$argon2id$garbage");
        assert!(matches!(result, Err(PasswordError::HashError(_))));
    }
}
