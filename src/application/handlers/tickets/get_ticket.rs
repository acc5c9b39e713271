//! GetTicketHandler - role-scoped single ticket read.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Principal, TicketId};
use crate::domain::ticket::Ticket;
use crate::ports::TicketRepository;

/// Handler for fetching one ticket. Staff can read any ticket; plain
/// users only their own.
pub struct GetTicketHandler {
    tickets: Arc<dyn TicketRepository>,
}

impl GetTicketHandler {
    pub fn new(tickets: Arc<dyn TicketRepository>) -> Self {
        Self { tickets }
    }

    pub async fn handle(
        &self,
        principal: &Principal,
        ticket_id: TicketId,
    ) -> Result<Ticket, DomainError> {
        let ticket = if principal.is_staff() {
            self.tickets.find_by_id(&ticket_id).await?
        } else {
            self.tickets.find_owned(&ticket_id, &principal.user_id).await?
        };

        ticket.ok_or_else(|| DomainError::new(ErrorCode::TicketNotFound, "Ticket not found!"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTicketRepository;
    use crate::domain::foundation::{Role, UserId};

    #[tokio::test]
    async fn owner_reads_own_ticket() {
        let tickets = Arc::new(InMemoryTicketRepository::new());
        let owner = UserId::new();
        let ticket = Ticket::create("t", "d", owner);
        let id = ticket.id;
        tickets.seed(ticket);
        let handler = GetTicketHandler::new(tickets);

        let found = handler
            .handle(&Principal::new(owner, Role::User), id)
            .await
            .unwrap();
        assert_eq!(found.id, id);
    }

    #[tokio::test]
    async fn another_users_ticket_reads_as_not_found() {
        let tickets = Arc::new(InMemoryTicketRepository::new());
        let ticket = Ticket::create("t", "d", UserId::new());
        let id = ticket.id;
        tickets.seed(ticket);
        let handler = GetTicketHandler::new(tickets);

        let err = handler
            .handle(&Principal::new(UserId::new(), Role::User), id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TicketNotFound);
    }

    #[tokio::test]
    async fn staff_read_any_ticket() {
        let tickets = Arc::new(InMemoryTicketRepository::new());
        let ticket = Ticket::create("t", "d", UserId::new());
        let id = ticket.id;
        tickets.seed(ticket);
        let handler = GetTicketHandler::new(tickets);

        assert!(handler
            .handle(&Principal::new(UserId::new(), Role::Admin), id)
            .await
            .is_ok());
    }
}
