//! Ticket aggregate.

mod status;

pub use status::TicketStatus;

use serde::{Deserialize, Serialize};

use crate::domain::analysis::Priority;
use crate::domain::foundation::{TicketId, Timestamp, UserId};

/// Score awarded to a moderator for each resolved ticket.
pub const RESOLUTION_POINTS: i32 = 10;

/// A support ticket.
///
/// Invariant: `resolved_at` and `resolved_by` are populated if and only if
/// `status` is [`TicketStatus::Resolved`]; the transitions in
/// [`Ticket::resolve`] and [`Ticket::reopen`] are the only writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub summary: String,
    pub priority: Option<Priority>,
    pub helpful_notes: String,
    pub related_skills: Vec<String>,
    pub status: TicketStatus,
    pub created_by: UserId,
    pub assigned_to: Option<UserId>,
    pub resolved_by: Option<UserId>,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Ticket {
    /// Builds a fresh ticket in the initial state.
    pub fn create(title: impl Into<String>, description: impl Into<String>, created_by: UserId) -> Self {
        Self {
            id: TicketId::new(),
            title: title.into(),
            description: description.into(),
            summary: String::new(),
            priority: None,
            helpful_notes: String::new(),
            related_skills: Vec::new(),
            status: TicketStatus::Todo,
            created_by,
            assigned_to: None,
            resolved_by: None,
            resolved_at: None,
            created_at: Timestamp::now(),
        }
    }

    /// Stamps the resolved state. Callers apply the resolver's score award
    /// separately and atomically with persisting this transition.
    pub fn resolve(&mut self, resolver: UserId, at: Timestamp) {
        self.status = TicketStatus::Resolved;
        self.resolved_by = Some(resolver);
        self.resolved_at = Some(at);
    }

    /// Clears the resolved state when a ticket leaves `Resolved`.
    pub fn reopen(&mut self, status: TicketStatus) {
        debug_assert!(!status.is_resolved());
        self.status = status;
        self.resolved_by = None;
        self.resolved_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_starts_in_todo() {
        let ticket = Ticket::create("Broken login", "Cannot sign in", UserId::new());
        assert_eq!(ticket.status, TicketStatus::Todo);
        assert!(ticket.assigned_to.is_none());
        assert!(ticket.resolved_by.is_none());
        assert!(ticket.resolved_at.is_none());
        assert!(ticket.summary.is_empty());
    }

    #[test]
    fn resolve_stamps_both_fields() {
        let mut ticket = Ticket::create("t", "d", UserId::new());
        let resolver = UserId::new();
        let at = Timestamp::now();

        ticket.resolve(resolver, at);

        assert!(ticket.status.is_resolved());
        assert_eq!(ticket.resolved_by, Some(resolver));
        assert_eq!(ticket.resolved_at, Some(at));
    }

    #[test]
    fn reopen_clears_both_fields() {
        let mut ticket = Ticket::create("t", "d", UserId::new());
        ticket.resolve(UserId::new(), Timestamp::now());

        ticket.reopen(TicketStatus::Pending);

        assert_eq!(ticket.status, TicketStatus::Pending);
        assert!(ticket.resolved_by.is_none());
        assert!(ticket.resolved_at.is_none());
    }
}
