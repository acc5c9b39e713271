//! UpdateTicketStatusHandler - the resolve/reopen state machine.
//!
//! Entering `RESOLVED` stamps the resolver and awards a moderator +1
//! issue / +10 score, replacing any stale history entry for the ticket.
//! Leaving `RESOLVED` reverses the award and clears the stamps. The pair
//! is symmetric, so toggling cannot drift a moderator's score.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Principal, Timestamp};
use crate::domain::ticket::{Ticket, TicketStatus, RESOLUTION_POINTS};
use crate::domain::user::{ResolvedTicketEntry, User};
use crate::ports::{TicketRepository, UserRepository};

/// Command to move a ticket between PENDING and RESOLVED.
#[derive(Debug, Clone)]
pub struct UpdateTicketStatusCommand {
    pub ticket_id: crate::domain::foundation::TicketId,
    pub status: String,
}

/// Result of a status update.
#[derive(Debug, Clone)]
pub struct UpdateTicketStatusResult {
    pub ticket: Ticket,
    pub moderator_stats: Option<User>,
}

/// Handler for ticket status updates.
pub struct UpdateTicketStatusHandler {
    tickets: Arc<dyn TicketRepository>,
    users: Arc<dyn UserRepository>,
}

impl UpdateTicketStatusHandler {
    pub fn new(tickets: Arc<dyn TicketRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { tickets, users }
    }

    pub async fn handle(
        &self,
        principal: &Principal,
        cmd: UpdateTicketStatusCommand,
    ) -> Result<UpdateTicketStatusResult, DomainError> {
        if !principal.is_staff() {
            return Err(DomainError::forbidden("Forbidden"));
        }

        let status = TicketStatus::parse_moderator_update(&cmd.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::InvalidStatus,
                "Invalid status. Use PENDING or RESOLVED.",
            )
        })?;

        let mut ticket = self
            .tickets
            .find_by_id(&cmd.ticket_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::TicketNotFound, "Ticket not found"))?;

        if principal.is_moderator() && ticket.assigned_to != Some(principal.user_id) {
            return Err(DomainError::forbidden(
                "You can only update your assigned tickets.",
            ));
        }

        let was_resolved = ticket.status.is_resolved();

        if was_resolved && !status.is_resolved() {
            if let Some(resolver) = ticket.resolved_by {
                self.users
                    .reverse_resolution(&resolver, RESOLUTION_POINTS)
                    .await?;
            }
            ticket.reopen(status);
        } else if !was_resolved && status.is_resolved() {
            let resolved_at = Timestamp::now();
            ticket.resolve(principal.user_id, resolved_at);

            if principal.is_moderator() {
                let entry =
                    ResolvedTicketEntry::new(ticket.id, ticket.title.clone(), resolved_at);
                self.users
                    .record_resolution(&principal.user_id, &entry, RESOLUTION_POINTS)
                    .await?;
            }
        } else {
            ticket.status = status;
        }

        self.tickets.update(&ticket).await?;

        let moderator_stats = self.users.find_by_id(&principal.user_id).await?;

        Ok(UpdateTicketStatusResult {
            ticket,
            moderator_stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryTicketRepository, InMemoryUserRepository};
    use crate::domain::foundation::{Role, TicketId, UserId};
    use proptest::prelude::*;

    struct Fixture {
        handler: UpdateTicketStatusHandler,
        users: Arc<InMemoryUserRepository>,
        tickets: Arc<InMemoryTicketRepository>,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let tickets = Arc::new(InMemoryTicketRepository::new());
        Fixture {
            handler: UpdateTicketStatusHandler::new(tickets.clone(), users.clone()),
            users,
            tickets,
        }
    }

    fn seed_moderator(f: &Fixture) -> Principal {
        let mut user = User::signup("mod@example.com", "hash", vec![]);
        user.role = Role::Moderator;
        let principal = Principal::new(user.id, user.role);
        f.users.seed(user);
        principal
    }

    fn seed_assigned_ticket(f: &Fixture, moderator: &Principal) -> TicketId {
        let mut ticket = Ticket::create("Broken login", "d", UserId::new());
        ticket.status = TicketStatus::Pending;
        ticket.assigned_to = Some(moderator.user_id);
        let id = ticket.id;
        f.tickets.seed(ticket);
        id
    }

    async fn set_status(f: &Fixture, principal: &Principal, id: TicketId, status: &str) {
        f.handler
            .handle(
                principal,
                UpdateTicketStatusCommand {
                    ticket_id: id,
                    status: status.to_string(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn resolving_stamps_and_awards() {
        let f = fixture();
        let moderator = seed_moderator(&f);
        let id = seed_assigned_ticket(&f, &moderator);

        let result = f
            .handler
            .handle(
                &moderator,
                UpdateTicketStatusCommand {
                    ticket_id: id,
                    status: "resolved".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(result.ticket.status.is_resolved());
        assert_eq!(result.ticket.resolved_by, Some(moderator.user_id));
        assert!(result.ticket.resolved_at.is_some());

        let stats = result.moderator_stats.unwrap();
        assert_eq!(stats.issues_resolved, 1);
        assert_eq!(stats.score, RESOLUTION_POINTS);

        let history = f.users.resolved_history(&moderator.user_id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].title, "Broken login");
    }

    #[tokio::test]
    async fn reopening_reverses_the_award_and_clears_stamps() {
        let f = fixture();
        let moderator = seed_moderator(&f);
        let id = seed_assigned_ticket(&f, &moderator);

        set_status(&f, &moderator, id, "RESOLVED").await;
        set_status(&f, &moderator, id, "PENDING").await;

        let ticket = f.tickets.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(ticket.status, TicketStatus::Pending);
        assert!(ticket.resolved_by.is_none());
        assert!(ticket.resolved_at.is_none());

        let user = f.users.find_by_id(&moderator.user_id).await.unwrap().unwrap();
        assert_eq!(user.issues_resolved, 0);
        assert_eq!(user.score, 0);
    }

    #[tokio::test]
    async fn re_resolving_does_not_duplicate_history() {
        let f = fixture();
        let moderator = seed_moderator(&f);
        let id = seed_assigned_ticket(&f, &moderator);

        set_status(&f, &moderator, id, "RESOLVED").await;
        set_status(&f, &moderator, id, "PENDING").await;
        set_status(&f, &moderator, id, "RESOLVED").await;

        let history = f.users.resolved_history(&moderator.user_id).await.unwrap();
        assert_eq!(history.len(), 1);

        let user = f.users.find_by_id(&moderator.user_id).await.unwrap().unwrap();
        assert_eq!(user.issues_resolved, 1);
        assert_eq!(user.score, RESOLUTION_POINTS);
    }

    #[tokio::test]
    async fn moderator_cannot_touch_unassigned_ticket() {
        let f = fixture();
        let moderator = seed_moderator(&f);
        let other = Principal::new(UserId::new(), Role::Moderator);
        let id = seed_assigned_ticket(&f, &other);

        let err = f
            .handler
            .handle(
                &moderator,
                UpdateTicketStatusCommand {
                    ticket_id: id,
                    status: "RESOLVED".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn admin_resolution_gets_no_award() {
        let f = fixture();
        let mut admin_user = User::signup("admin@example.com", "hash", vec![]);
        admin_user.role = Role::Admin;
        let admin = Principal::new(admin_user.id, admin_user.role);
        f.users.seed(admin_user);

        let mut ticket = Ticket::create("t", "d", UserId::new());
        ticket.status = TicketStatus::Pending;
        let id = ticket.id;
        f.tickets.seed(ticket);

        set_status(&f, &admin, id, "RESOLVED").await;

        let user = f.users.find_by_id(&admin.user_id).await.unwrap().unwrap();
        assert_eq!(user.issues_resolved, 0);
        assert_eq!(user.score, 0);

        let ticket = f.tickets.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(ticket.resolved_by, Some(admin.user_id));
    }

    #[tokio::test]
    async fn plain_user_is_forbidden() {
        let f = fixture();
        let user = Principal::new(UserId::new(), Role::User);
        let err = f
            .handler
            .handle(
                &user,
                UpdateTicketStatusCommand {
                    ticket_id: TicketId::new(),
                    status: "RESOLVED".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn unrecognized_status_is_rejected() {
        let f = fixture();
        let moderator = seed_moderator(&f);
        let id = seed_assigned_ticket(&f, &moderator);

        let err = f
            .handler
            .handle(
                &moderator,
                UpdateTicketStatusCommand {
                    ticket_id: id,
                    status: "ARCHIVED".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStatus);
    }

    proptest! {
        // Any toggle sequence nets out: even half-cycles leave the score
        // untouched, odd ones leave exactly one award.
        #[test]
        fn toggling_never_drifts_the_score(half_cycles in 0usize..8) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let (issues_resolved, score) = rt.block_on(async {
                let f = fixture();
                let moderator = seed_moderator(&f);
                let id = seed_assigned_ticket(&f, &moderator);

                for i in 0..half_cycles {
                    let status = if i % 2 == 0 { "RESOLVED" } else { "PENDING" };
                    set_status(&f, &moderator, id, status).await;
                }

                let user = f.users.find_by_id(&moderator.user_id).await.unwrap().unwrap();
                (user.issues_resolved, user.score)
            });

            let expected: i32 = if half_cycles % 2 == 1 { 1 } else { 0 };
            prop_assert_eq!(issues_resolved, expected);
            prop_assert_eq!(score, expected * RESOLUTION_POINTS);
        }
    }
}
