//! Configuration error types

use thiserror::Error;

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Read(#[from] config::ConfigError),
}

/// Errors raised by semantic validation of loaded configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required configuration value: {0}")]
    MissingRequired(&'static str),

    #[error("Server port must be non-zero")]
    InvalidPort,

    #[error("Database URL must start with postgres:// or postgresql://")]
    InvalidDatabaseUrl,

    #[error("Database pool size must be between 1 and 100")]
    InvalidPoolSize,

    #[error("JWT secret must be at least 16 characters")]
    WeakJwtSecret,

    #[error("Subscription amount must be greater than zero")]
    InvalidSubscriptionAmount,

    #[error("Subscription credit grant must be greater than zero")]
    InvalidSubscriptionCredits,

    #[error("Payment gateway credentials look like placeholders; set real keys or enable mock mode explicitly")]
    PlaceholderGatewayCredentials,

    #[error("Resend API key must start with re_")]
    InvalidResendKey,

    #[error("From email address is invalid")]
    InvalidFromEmail,
}
