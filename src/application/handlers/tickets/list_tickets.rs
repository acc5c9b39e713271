//! ListTicketsHandler - role-scoped ticket listing.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Principal};
use crate::domain::ticket::Ticket;
use crate::ports::TicketRepository;

/// Handler for the ticket listing endpoint. Staff see everything; plain
/// users see only their own tickets.
pub struct ListTicketsHandler {
    tickets: Arc<dyn TicketRepository>,
}

impl ListTicketsHandler {
    pub fn new(tickets: Arc<dyn TicketRepository>) -> Self {
        Self { tickets }
    }

    pub async fn handle(&self, principal: &Principal) -> Result<Vec<Ticket>, DomainError> {
        if principal.is_staff() {
            self.tickets.list_all().await
        } else {
            self.tickets.list_for_creator(&principal.user_id).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTicketRepository;
    use crate::domain::foundation::{Role, UserId};

    #[tokio::test]
    async fn users_see_only_their_own_tickets() {
        let tickets = Arc::new(InMemoryTicketRepository::new());
        let mine = UserId::new();
        tickets.seed(Ticket::create("mine", "d", mine));
        tickets.seed(Ticket::create("theirs", "d", UserId::new()));
        let handler = ListTicketsHandler::new(tickets);

        let listed = handler
            .handle(&Principal::new(mine, Role::User))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "mine");
    }

    #[tokio::test]
    async fn staff_see_every_ticket() {
        let tickets = Arc::new(InMemoryTicketRepository::new());
        tickets.seed(Ticket::create("a", "d", UserId::new()));
        tickets.seed(Ticket::create("b", "d", UserId::new()));
        let handler = ListTicketsHandler::new(tickets);

        let listed = handler
            .handle(&Principal::new(UserId::new(), Role::Moderator))
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
    }
}
