//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Authentication configuration (JWT + password reset)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign bearer tokens
    pub jwt_secret: SecretString,

    /// Bearer token time-to-live in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,

    /// Password-reset token time-to-live in seconds
    #[serde(default = "default_reset_token_ttl")]
    pub reset_token_ttl_secs: u64,
}

impl AuthConfig {
    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.jwt_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("JWT_SECRET"));
        }
        if self.jwt_secret.expose_secret().len() < 16 {
            return Err(ValidationError::WeakJwtSecret);
        }
        Ok(())
    }
}

fn default_token_ttl() -> u64 {
    // 7 days
    7 * 24 * 60 * 60
}

fn default_reset_token_ttl() -> u64 {
    // 15 minutes
    15 * 60
}
