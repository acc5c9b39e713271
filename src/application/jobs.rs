//! Routes background jobs to their executing handlers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::handlers::analysis::ProcessTicketHandler;
use crate::application::handlers::auth::PasswordResetFlow;
use crate::ports::{BackgroundJob, JobError, JobHandler};

/// Dispatches each [`BackgroundJob`] variant to the operation that
/// serves it. The operations themselves are the same ones callers run
/// inline when enqueueing fails.
pub struct JobRouter {
    process_ticket: Arc<ProcessTicketHandler>,
    password_reset: Arc<PasswordResetFlow>,
}

impl JobRouter {
    pub fn new(
        process_ticket: Arc<ProcessTicketHandler>,
        password_reset: Arc<PasswordResetFlow>,
    ) -> Self {
        Self {
            process_ticket,
            password_reset,
        }
    }
}

#[async_trait]
impl JobHandler for JobRouter {
    async fn run(&self, job: BackgroundJob) -> Result<(), JobError> {
        match job {
            BackgroundJob::TicketCreated { ticket_id } => {
                self.process_ticket.handle(ticket_id).await?;
                Ok(())
            }
            BackgroundJob::PasswordResetRequested { email } => {
                self.password_reset.run(&email).await
            }
        }
    }
}
