//! Outbound mail port.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the mail sender.
#[derive(Debug, Clone, Error)]
pub enum MailError {
    #[error("Mail delivery is not configured")]
    NotConfigured,

    #[error("Mail delivery failed: {0}")]
    Delivery(String),
}

/// Port for sending plain-text mail.
///
/// Every send in this system is best-effort; callers log failures and
/// carry on.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}
