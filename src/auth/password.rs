//! Argon2id password digests in PHC string form. Hashing is CPU bound, so the
//! async entry points run it on the blocking pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

use crate::config::SecurityConfig;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Invalid hash parameters: {0}")]
    Params(String),

    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Invalid password hash: {0}")]
    MalformedDigest(String),

    #[error("Password task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Argon2 cost settings taken from configuration
#[derive(Debug, Clone, Copy)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
}

impl From<&SecurityConfig> for HashCost {
    fn from(security: &SecurityConfig) -> Self {
        Self {
            memory_kib: security.password_hash_memory_kib,
            iterations: security.password_hash_iterations,
        }
    }
}

fn hasher(cost: HashCost) -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(cost.memory_kib, cost.iterations, 1, None)
        .map_err(|e| PasswordError::Params(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str, cost: HashCost) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher(cost)?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string. Cost parameters are read
/// from the digest itself.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, PasswordError> {
    let parsed =
        PasswordHash::new(digest).map_err(|e| PasswordError::MalformedDigest(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub async fn hash_password_async(password: String, cost: HashCost) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost)).await?
}

pub async fn verify_password_async(password: String, digest: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &digest)).await?
}
