use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::errors::AdminError;

/// Argon2id hash in PHC string format, with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, AdminError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AdminError::Hash(e.to_string()))
}

/// Whether `plain` matches a stored PHC hash. A malformed hash is an error,
/// a wrong password is `Ok(false)`.
pub fn verify_password(plain: &str, stored: &str) -> Result<bool, AdminError> {
    let parsed = PasswordHash::new(stored).map_err(|e| AdminError::Hash(e.to_string()))?;
    Ok(Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok())
}
