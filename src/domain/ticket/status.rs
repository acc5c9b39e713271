//! Ticket status machine.
//!
//! Stored strings match the historical values: `"Todo"` is the
//! human-facing initial state, `"TODO"` marks a ticket queued for or under
//! AI analysis, `"PENDING"` awaits moderator action, `"RESOLVED"` is the
//! (reopenable) terminal state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TicketStatus {
    /// Freshly created, analysis not yet started.
    #[default]
    Todo,
    /// Queued for / undergoing AI analysis.
    Analyzing,
    /// Analyzed, awaiting moderator action.
    Pending,
    /// Resolved by a staff member; may be reopened.
    Resolved,
}

impl TicketStatus {
    /// The stored/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Todo => "Todo",
            TicketStatus::Analyzing => "TODO",
            TicketStatus::Pending => "PENDING",
            TicketStatus::Resolved => "RESOLVED",
        }
    }

    /// Parses a stored status string.
    ///
    /// Exact `"TODO"` is the analyzing state; any other casing of "todo"
    /// is the human-facing initial state.
    pub fn parse(s: &str) -> Option<Self> {
        if s == "TODO" {
            return Some(TicketStatus::Analyzing);
        }
        if s.eq_ignore_ascii_case("todo") {
            return Some(TicketStatus::Todo);
        }
        if s.eq_ignore_ascii_case("pending") {
            return Some(TicketStatus::Pending);
        }
        if s.eq_ignore_ascii_case("resolved") {
            return Some(TicketStatus::Resolved);
        }
        None
    }

    /// Parses a status submitted by a staff member on the update endpoint.
    /// Only the two moderator-driven states are accepted.
    pub fn parse_moderator_update(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(TicketStatus::Pending),
            "RESOLVED" => Some(TicketStatus::Resolved),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, TicketStatus::Resolved)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
