//! ProcessTicketHandler - the post-creation analysis pipeline.
//!
//! Runs after every ticket creation, normally on the background runner
//! and inline when the runner is unreachable: force the ticket into the
//! analyzing state, ask the model for a structured analysis, write the
//! results back (defaulted when the model returns nothing usable), pick
//! an assignee, and notify them best-effort.

use std::sync::Arc;

use crate::domain::analysis::{Priority, TicketAnalysis};
use crate::domain::foundation::TicketId;
use crate::domain::triage::{select_assignee, AssigneeCandidate};
use crate::ports::{JobError, Mailer, TicketAnalyzer, TicketRepository, UserRepository};

/// Summary written when the model produced nothing usable.
const FALLBACK_SUMMARY: &str = "Summary unavailable.";

/// Notes written when the model produced nothing usable.
const FALLBACK_NOTES: &str = "AI analysis unavailable. Moderator can proceed manually.";

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct ProcessTicketResult {
    pub assignee: Option<AssigneeCandidate>,
}

/// Handler for the ticket analysis + triage pipeline.
pub struct ProcessTicketHandler {
    tickets: Arc<dyn TicketRepository>,
    users: Arc<dyn UserRepository>,
    analyzer: Arc<dyn TicketAnalyzer>,
    mailer: Arc<dyn Mailer>,
}

impl ProcessTicketHandler {
    pub fn new(
        tickets: Arc<dyn TicketRepository>,
        users: Arc<dyn UserRepository>,
        analyzer: Arc<dyn TicketAnalyzer>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            tickets,
            users,
            analyzer,
            mailer,
        }
    }

    pub async fn handle(&self, ticket_id: TicketId) -> Result<ProcessTicketResult, JobError> {
        let ticket = self
            .tickets
            .find_by_id(&ticket_id)
            .await
            .map_err(|e| JobError::retriable(e.to_string()))?
            .ok_or_else(|| JobError::non_retriable("Ticket not found"))?;

        self.tickets
            .mark_analyzing(&ticket_id)
            .await
            .map_err(|e| JobError::retriable(e.to_string()))?;

        let analysis = self
            .analyzer
            .analyze(&ticket.title, &ticket.description)
            .await;
        let analysis = apply_defaults(analysis);

        self.tickets
            .apply_analysis(&ticket_id, &analysis)
            .await
            .map_err(|e| JobError::retriable(e.to_string()))?;

        let assignee = self.pick_assignee(&analysis.related_skills, &ticket.created_by).await?;

        self.tickets
            .assign(&ticket_id, assignee.as_ref().map(|a| &a.id))
            .await
            .map_err(|e| JobError::retriable(e.to_string()))?;

        if let Some(assignee) = &assignee {
            let body = format!("A new ticket is assigned to you: {}", ticket.title);
            if let Err(e) = self.mailer.send(&assignee.email, "Ticket Assigned", &body).await {
                tracing::warn!(ticket_id = %ticket_id, error = %e, "assignee notification failed");
            }
        }

        Ok(ProcessTicketResult { assignee })
    }

    async fn pick_assignee(
        &self,
        tags: &[String],
        created_by: &crate::domain::foundation::UserId,
    ) -> Result<Option<AssigneeCandidate>, JobError> {
        let moderators = self
            .users
            .moderator_candidates()
            .await
            .map_err(|e| JobError::retriable(e.to_string()))?;
        let admins = self
            .users
            .admin_candidates()
            .await
            .map_err(|e| JobError::retriable(e.to_string()))?;
        let creator = self
            .users
            .candidate(created_by)
            .await
            .map_err(|e| JobError::retriable(e.to_string()))?;

        Ok(select_assignee(tags, &moderators, &admins, creator.as_ref()).cloned())
    }
}

fn apply_defaults(analysis: Option<TicketAnalysis>) -> TicketAnalysis {
    match analysis {
        Some(mut a) => {
            if a.summary.trim().is_empty() {
                a.summary = FALLBACK_SUMMARY.to_string();
            }
            if a.helpful_notes.trim().is_empty() {
                a.helpful_notes = FALLBACK_NOTES.to_string();
            }
            a
        }
        None => TicketAnalysis {
            summary: FALLBACK_SUMMARY.to_string(),
            priority: Priority::Medium,
            helpful_notes: FALLBACK_NOTES.to_string(),
            related_skills: Vec::new(),
        },
    }
}
