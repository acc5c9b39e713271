//! DeleteTicketHandler - removal with history soft-delete.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Principal, TicketId, Timestamp};
use crate::domain::user::User;
use crate::ports::{TicketRepository, UserRepository};

/// Result of a deletion.
#[derive(Debug, Clone)]
pub struct DeleteTicketResult {
    pub moderator_stats: Option<User>,
}

/// Handler for ticket deletion. Moderators may delete their own
/// assignments; admins anything. The resolver's history entry survives
/// with a deletion stamp so the audit trail outlives the ticket.
pub struct DeleteTicketHandler {
    tickets: Arc<dyn TicketRepository>,
    users: Arc<dyn UserRepository>,
}

impl DeleteTicketHandler {
    pub fn new(tickets: Arc<dyn TicketRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { tickets, users }
    }

    pub async fn handle(
        &self,
        principal: &Principal,
        ticket_id: TicketId,
    ) -> Result<DeleteTicketResult, DomainError> {
        if !principal.is_staff() {
            return Err(DomainError::forbidden("Forbidden"));
        }

        let ticket = self
            .tickets
            .find_by_id(&ticket_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::TicketNotFound, "Ticket not found"))?;

        if principal.is_moderator() && ticket.assigned_to != Some(principal.user_id) {
            return Err(DomainError::forbidden(
                "You can only delete your assigned tickets.",
            ));
        }

        if let Some(resolver) = ticket.resolved_by {
            self.users
                .mark_history_deleted(&resolver, &ticket.id, Timestamp::now())
                .await?;
        }

        self.tickets.delete(&ticket_id).await?;

        let moderator_stats = if principal.is_moderator() {
            self.users.find_by_id(&principal.user_id).await?
        } else {
            None
        };

        Ok(DeleteTicketResult { moderator_stats })
    }
}
