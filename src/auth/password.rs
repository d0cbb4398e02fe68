// Password hashing and verification

use crate::error::ApiError;
use argon2::{
    password_hash::{rand_core::OsRng, Error as HashError, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

/// Hash a plaintext password with Argon2id and a random salt.
pub fn hash_password(plain: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::SystemError(format!("password hashing failed: {}", e)))
}

/// Compare a plaintext password against a stored hash.
///
/// A mismatch is `Ok(false)`, never an error; only a malformed stored hash
/// or a primitive failure surfaces as `SystemError`.
pub fn verify_password(hash: &str, plain: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ApiError::SystemError(format!("malformed password hash: {}", e)))?;

    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(ApiError::SystemError(format!(
            "password verification failed: {}",
            e
        ))),
    }
}
