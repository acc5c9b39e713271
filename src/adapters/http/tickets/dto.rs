//! Request/response DTOs for the ticket endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::ticket::Ticket;
use crate::domain::user::{CreditSnapshot, ResolvedTicketEntry, User};

#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// Full ticket as staff see it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub summary: String,
    pub priority: Option<String>,
    pub helpful_notes: String,
    pub related_skills: Vec<String>,
    pub status: String,
    pub created_by: String,
    pub assigned_to: Option<String>,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<&Ticket> for TicketView {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id.to_string(),
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            summary: ticket.summary.clone(),
            priority: ticket.priority.map(|p| p.as_str().to_string()),
            helpful_notes: ticket.helpful_notes.clone(),
            related_skills: ticket.related_skills.clone(),
            status: ticket.status.as_str().to_string(),
            created_by: ticket.created_by.to_string(),
            assigned_to: ticket.assigned_to.map(|u| u.to_string()),
            resolved_by: ticket.resolved_by.map(|u| u.to_string()),
            resolved_at: ticket.resolved_at,
            created_at: ticket.created_at,
        }
    }
}

/// Trimmed ticket as its creator sees it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSummaryView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub summary: String,
    pub status: String,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<&Ticket> for TicketSummaryView {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id.to_string(),
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            summary: ticket.summary.clone(),
            status: ticket.status.as_str().to_string(),
            resolved_at: ticket.resolved_at,
            created_at: ticket.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditsInfo {
    pub credits_remaining: i32,
    pub credits_used: i32,
    pub subscription_status: String,
}

impl From<&CreditSnapshot> for CreditsInfo {
    fn from(snapshot: &CreditSnapshot) -> Self {
        Self {
            credits_remaining: snapshot.credits_remaining,
            credits_used: snapshot.credits_used,
            subscription_status: snapshot.subscription_status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateTicketResponse {
    pub message: String,
    pub ticket: TicketView,
    pub credits: Option<CreditsInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeratorStatsView {
    pub email: String,
    pub role: String,
    pub issues_resolved: i32,
    pub score: i32,
}

impl From<&User> for ModeratorStatsView {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            issues_resolved: user.issues_resolved,
            score: user.score,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolvedHistoryView {
    pub ticket_id: Option<String>,
    pub title: String,
    pub resolved_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl From<&ResolvedTicketEntry> for SolvedHistoryView {
    fn from(entry: &ResolvedTicketEntry) -> Self {
        Self {
            ticket_id: entry.ticket_id.map(|t| t.to_string()),
            title: entry.title.clone(),
            resolved_at: entry.resolved_at,
            deleted_at: entry.deleted_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedTicketsResponse {
    pub tickets: Vec<TicketView>,
    pub solved_history: Vec<SolvedHistoryView>,
    pub moderator_stats: Option<ModeratorStatsView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusResponse {
    pub message: String,
    pub ticket: TicketView,
    pub moderator_stats: Option<ModeratorStatsView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTicketResponse {
    pub message: String,
    pub moderator_stats: Option<ModeratorStatsView>,
}

#[derive(Debug, Serialize)]
pub struct TicketResponse {
    pub ticket: TicketView,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    #[test]
    fn summary_view_drops_staff_fields() {
        let ticket = Ticket::create("t", "d", UserId::new());
        let json = serde_json::to_string(&TicketSummaryView::from(&ticket)).unwrap();
        assert!(!json.contains("helpfulNotes"));
        assert!(!json.contains("assignedTo"));
        assert!(json.contains("\"status\":\"Todo\""));
    }

    #[test]
    fn full_view_serializes_camel_case() {
        let ticket = Ticket::create("t", "d", UserId::new());
        let json = serde_json::to_string(&TicketView::from(&ticket)).unwrap();
        assert!(json.contains("relatedSkills"));
        assert!(json.contains("createdBy"));
    }
}
