//! Password-reset token generation and hashing.
//!
//! The raw token travels in the reset link; only its SHA-256 hex digest
//! is stored, so a leaked database row cannot be replayed as a link.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// A freshly generated reset token pair.
#[derive(Debug, Clone)]
pub struct ResetToken {
    /// Sent to the user inside the reset link.
    pub raw: String,
    /// Stored on the account.
    pub hash: String,
}

/// Generates a new 32-byte random token and its stored hash.
pub fn generate_reset_token() -> ResetToken {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let raw = hex::encode(bytes);
    let hash = hash_reset_token(&raw);
    ResetToken { raw, hash }
}

/// Hashes a raw token the way it is stored.
pub fn hash_reset_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
