//! Argon2id password hashing, verification, and strength validation.
//!
//! All password hashes use the Argon2id variant with a random salt generated
//! via [`OsRng`]. The PHC string format is used for storage so that algorithm
//! parameters and salt are embedded in the hash itself.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use hive_core::auth::SecretHasher;
use hive_core::error::CoreError;
use password_hash::rand_core::OsRng;

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (algorithm, params, salt, hash).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default(); // Argon2id with default params
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Validate that a password meets minimum strength requirements.
///
/// Currently enforces a minimum character length. Returns `Err` with a
/// human-readable explanation when the password is too short.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}

/// [`SecretHasher`] backed by Argon2id.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl SecretHasher for Argon2Hasher {
    fn hash(&self, secret: &str) -> Result<String, CoreError> {
        hash_password(secret)
            .map_err(|e| CoreError::Internal(format!("Password hashing failed: {e}")))
    }

    fn verify(&self, secret: &str, digest: &str) -> Result<bool, CoreError> {
        verify_password(secret, digest)
            .map_err(|e| CoreError::Internal(format!("Password verification failed: {e}")))
    }
}
