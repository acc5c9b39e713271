//! Bearer token port.

use thiserror::Error;

use crate::domain::foundation::Principal;

/// Errors from token issue/verification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Port for signing and verifying bearer tokens.
pub trait TokenService: Send + Sync {
    /// Issues a token carrying the principal's identity and role.
    fn issue(&self, principal: &Principal) -> Result<String, TokenError>;

    /// Verifies a token and extracts the request principal.
    fn verify(&self, token: &str) -> Result<Principal, TokenError>;
}
