//! Password hashing port.

use thiserror::Error;

/// Errors from password hashing.
#[derive(Debug, Clone, Error)]
#[error("Password hashing failed: {0}")]
pub struct HashError(pub String);

/// Port for hashing and verifying passwords.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, HashError>;

    fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError>;
}
