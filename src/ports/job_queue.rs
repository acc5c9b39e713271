//! Background job queue and handler ports.
//!
//! Side effects that should not block the request (AI analysis, password
//! reset mail) are enqueued as jobs. Delivery is at-least-once with a
//! small retry budget; callers that fail to enqueue run the same
//! operation inline before responding.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::TicketId;

/// Work items the background runner executes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackgroundJob {
    /// A ticket was created and awaits analysis + triage.
    TicketCreated { ticket_id: TicketId },
    /// A password reset was requested for this email.
    PasswordResetRequested { email: String },
}

impl BackgroundJob {
    pub fn name(&self) -> &'static str {
        match self {
            BackgroundJob::TicketCreated { .. } => "ticket/created",
            BackgroundJob::PasswordResetRequested { .. } => "user/forgot-password",
        }
    }
}

/// Raised when a job cannot be handed to the runner; the caller falls
/// back to running the operation inline.
#[derive(Debug, Clone, Error)]
#[error("Background runner unavailable: {0}")]
pub struct EnqueueError(pub String);

/// Errors a job execution can produce.
#[derive(Debug, Clone, Error)]
pub enum JobError {
    /// Worth retrying (transient infrastructure trouble).
    #[error("{0}")]
    Retriable(String),

    /// Retrying cannot help (e.g. the ticket no longer exists).
    #[error("{0}")]
    NonRetriable(String),
}

impl JobError {
    pub fn retriable(message: impl Into<String>) -> Self {
        JobError::Retriable(message.into())
    }

    pub fn non_retriable(message: impl Into<String>) -> Self {
        JobError::NonRetriable(message.into())
    }

    pub fn is_retriable(&self) -> bool {
        matches!(self, JobError::Retriable(_))
    }
}

/// Port for submitting jobs to the background runner.
pub trait JobQueue: Send + Sync {
    fn enqueue(&self, job: BackgroundJob) -> Result<(), EnqueueError>;
}

/// Port implemented by whatever executes jobs.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn run(&self, job: BackgroundJob) -> Result<(), JobError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_names_are_stable() {
        let ticket = BackgroundJob::TicketCreated {
            ticket_id: TicketId::new(),
        };
        assert_eq!(ticket.name(), "ticket/created");

        let reset = BackgroundJob::PasswordResetRequested {
            email: "a@b.test".to_string(),
        };
        assert_eq!(reset.name(), "user/forgot-password");
    }

    #[test]
    fn retriable_classification() {
        assert!(JobError::retriable("timeout").is_retriable());
        assert!(!JobError::non_retriable("gone").is_retriable());
    }
}
