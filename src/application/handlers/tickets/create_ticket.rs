//! CreateTicketHandler - credit-gated ticket creation.
//!
//! Free users consume one credit per ticket through a guarded debit; the
//! analysis job is queued, with an inline fallback when the runner is
//! unreachable. Any hard failure after a successful debit refunds it.

use std::sync::Arc;

use crate::application::handlers::analysis::ProcessTicketHandler;
use crate::domain::foundation::{DomainError, ErrorCode, Principal, Role};
use crate::domain::ticket::Ticket;
use crate::domain::user::CreditSnapshot;
use crate::ports::{BackgroundJob, JobQueue, TicketRepository, UserRepository};

/// Command to create a ticket.
#[derive(Debug, Clone)]
pub struct CreateTicketCommand {
    pub title: String,
    pub description: String,
}

/// Result of ticket creation.
#[derive(Debug, Clone)]
pub struct CreateTicketResult {
    pub ticket: Ticket,
    /// Post-debit counters; `None` for staff, who are not credit-gated.
    pub credits: Option<CreditSnapshot>,
    /// Whether the analysis job reached the background runner (`false`
    /// means the inline fallback already processed the ticket).
    pub queued: bool,
}

/// Handler for ticket creation.
pub struct CreateTicketHandler {
    users: Arc<dyn UserRepository>,
    tickets: Arc<dyn TicketRepository>,
    queue: Arc<dyn JobQueue>,
    pipeline: Arc<ProcessTicketHandler>,
}

impl CreateTicketHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tickets: Arc<dyn TicketRepository>,
        queue: Arc<dyn JobQueue>,
        pipeline: Arc<ProcessTicketHandler>,
    ) -> Self {
        Self {
            users,
            tickets,
            queue,
            pipeline,
        }
    }

    pub async fn handle(
        &self,
        principal: &Principal,
        cmd: CreateTicketCommand,
    ) -> Result<CreateTicketResult, DomainError> {
        if cmd.title.trim().is_empty() || cmd.description.trim().is_empty() {
            return Err(DomainError::validation("Title and description are required."));
        }

        let requester = self
            .users
            .find_by_id(&principal.user_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "User not found."))?;

        let mut credits = None;
        if requester.role == Role::User {
            credits = Some(
                self.users
                    .debit_credit(&principal.user_id)
                    .await?
                    .ok_or_else(DomainError::credit_exhausted)?,
            );
        }

        match self.create_and_dispatch(principal, cmd).await {
            Ok((ticket, queued)) => Ok(CreateTicketResult {
                ticket,
                credits,
                queued,
            }),
            Err(e) => {
                // Compensate the consumed credit; a refund failure is
                // logged, not retried.
                if credits.is_some() {
                    if let Err(refund_err) = self.users.refund_credit(&principal.user_id).await {
                        tracing::error!(
                            user_id = %principal.user_id,
                            error = %refund_err,
                            "credit refund failed after ticket creation error"
                        );
                    }
                }
                Err(e)
            }
        }
    }

    async fn create_and_dispatch(
        &self,
        principal: &Principal,
        cmd: CreateTicketCommand,
    ) -> Result<(Ticket, bool), DomainError> {
        let ticket = Ticket::create(cmd.title, cmd.description, principal.user_id);
        self.tickets.insert(&ticket).await?;

        let job = BackgroundJob::TicketCreated {
            ticket_id: ticket.id,
        };
        let queued = match self.queue.enqueue(job) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "analysis dispatch failed, running inline");
                self.pipeline
                    .handle(ticket.id)
                    .await
                    .map_err(|e| DomainError::internal(e.to_string()))?;
                false
            }
        };

        // Re-read so the caller sees whatever the inline path wrote.
        let latest = self
            .tickets
            .find_by_id(&ticket.id)
            .await?
            .unwrap_or(ticket);
        Ok((latest, queued))
    }
}
