//! AssignedTicketsHandler - a moderator's work queue and solved history.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Principal};
use crate::domain::ticket::Ticket;
use crate::domain::user::{newest_first_capped, ResolvedTicketEntry, User};
use crate::ports::{TicketRepository, UserRepository};

/// Result of the assigned-tickets query.
#[derive(Debug, Clone)]
pub struct AssignedTicketsResult {
    pub tickets: Vec<Ticket>,
    pub solved_history: Vec<ResolvedTicketEntry>,
    pub moderator_stats: Option<User>,
}

/// Handler for the moderator dashboard.
pub struct AssignedTicketsHandler {
    tickets: Arc<dyn TicketRepository>,
    users: Arc<dyn UserRepository>,
}

impl AssignedTicketsHandler {
    pub fn new(tickets: Arc<dyn TicketRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { tickets, users }
    }

    pub async fn handle(
        &self,
        principal: &Principal,
    ) -> Result<AssignedTicketsResult, DomainError> {
        if !principal.is_moderator() {
            return Err(DomainError::forbidden("Forbidden"));
        }

        let tickets = self.tickets.list_assigned_open(&principal.user_id).await?;
        let history = self.users.resolved_history(&principal.user_id).await?;
        let moderator_stats = self.users.find_by_id(&principal.user_id).await?;

        Ok(AssignedTicketsResult {
            tickets,
            solved_history: newest_first_capped(history),
            moderator_stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryTicketRepository, InMemoryUserRepository};
    use crate::domain::foundation::{ErrorCode, Role, TicketId, Timestamp, UserId};

    #[tokio::test]
    async fn lists_open_assignments_and_history() {
        let users = Arc::new(InMemoryUserRepository::new());
        let tickets = Arc::new(InMemoryTicketRepository::new());

        let mut moderator = User::signup("mod@x.test", "h", vec![]);
        moderator.role = Role::Moderator;
        let principal = Principal::new(moderator.id, moderator.role);
        users.seed(moderator);

        let mut open = Ticket::create("open", "d", UserId::new());
        open.assigned_to = Some(principal.user_id);
        tickets.seed(open);

        let entry = ResolvedTicketEntry::new(TicketId::new(), "done", Timestamp::now());
        users
            .record_resolution(&principal.user_id, &entry, 10)
            .await
            .unwrap();

        let handler = AssignedTicketsHandler::new(tickets, users);
        let result = handler.handle(&principal).await.unwrap();

        assert_eq!(result.tickets.len(), 1);
        assert_eq!(result.solved_history.len(), 1);
        let stats = result.moderator_stats.unwrap();
        assert_eq!(stats.issues_resolved, 1);
    }

    #[tokio::test]
    async fn non_moderators_are_forbidden() {
        let handler = AssignedTicketsHandler::new(
            Arc::new(InMemoryTicketRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        );

        for role in [Role::User, Role::Admin] {
            let err = handler
                .handle(&Principal::new(UserId::new(), role))
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::Forbidden);
        }
    }
}
