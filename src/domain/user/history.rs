//! History sub-records owned by a user.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{TicketId, Timestamp};

/// Upper bound on the solved-ticket history returned to moderators.
pub const SOLVED_HISTORY_CAP: usize = 100;

/// A resolved ticket remembered on the resolver's account.
///
/// The entry outlives the ticket: deleting the ticket stamps `deleted_at`
/// instead of removing the row, preserving the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTicketEntry {
    pub ticket_id: Option<TicketId>,
    pub title: String,
    pub resolved_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl ResolvedTicketEntry {
    pub fn new(ticket_id: TicketId, title: impl Into<String>, resolved_at: Timestamp) -> Self {
        Self {
            ticket_id: Some(ticket_id),
            title: title.into(),
            resolved_at,
            deleted_at: None,
        }
    }
}

/// A payment remembered on the payer's account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentHistoryEntry {
    pub gateway_payment_id: String,
    pub gateway_order_id: String,
    pub amount: i64,
    pub currency: String,
    pub credits_added: i32,
    pub verified_at: Timestamp,
}

/// Sorts newest-first by resolution time and caps the list, the shape
/// moderators see on their dashboard.
pub fn newest_first_capped(mut entries: Vec<ResolvedTicketEntry>) -> Vec<ResolvedTicketEntry> {
    entries.sort_by(|a, b| b.resolved_at.cmp(&a.resolved_at));
    entries.truncate(SOLVED_HISTORY_CAP);
    entries
}
