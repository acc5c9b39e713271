//! Ticket repository port.

use async_trait::async_trait;

use crate::domain::analysis::TicketAnalysis;
use crate::domain::foundation::{DomainError, TicketId, UserId};
use crate::domain::ticket::Ticket;

/// Port for ticket persistence.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn insert(&self, ticket: &Ticket) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, DomainError>;

    /// A ticket only if it belongs to `creator` (user-scoped reads).
    async fn find_owned(
        &self,
        id: &TicketId,
        creator: &UserId,
    ) -> Result<Option<Ticket>, DomainError>;

    /// Every ticket, newest first (staff listing).
    async fn list_all(&self) -> Result<Vec<Ticket>, DomainError>;

    /// Tickets created by one user, newest first.
    async fn list_for_creator(&self, creator: &UserId) -> Result<Vec<Ticket>, DomainError>;

    /// Unresolved tickets assigned to a moderator, newest first.
    async fn list_assigned_open(&self, assignee: &UserId) -> Result<Vec<Ticket>, DomainError>;

    /// Persists a full aggregate update (status transitions).
    async fn update(&self, ticket: &Ticket) -> Result<(), DomainError>;

    /// Marks a ticket as queued for analysis.
    async fn mark_analyzing(&self, id: &TicketId) -> Result<(), DomainError>;

    /// Writes back analysis results and moves the ticket to pending.
    async fn apply_analysis(
        &self,
        id: &TicketId,
        analysis: &TicketAnalysis,
    ) -> Result<(), DomainError>;

    /// Persists the chosen assignee.
    async fn assign(&self, id: &TicketId, assignee: Option<&UserId>) -> Result<(), DomainError>;

    async fn delete(&self, id: &TicketId) -> Result<(), DomainError>;
}
