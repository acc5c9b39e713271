//! bcrypt implementation of the PasswordHasher port.

use crate::ports::{HashError, PasswordHasher};

/// Work factor for password hashes.
const BCRYPT_COST: u32 = 10;

/// Password hasher backed by bcrypt.
#[derive(Default)]
pub struct BcryptPasswordHasher;

impl BcryptPasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        bcrypt::hash(password, BCRYPT_COST).map_err(|e| HashError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError> {
        bcrypt::verify(password, hash).map_err(|e| HashError(e.to_string()))
    }
}
