//! In-memory implementation of TicketRepository.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::analysis::TicketAnalysis;
use crate::domain::foundation::{DomainError, ErrorCode, TicketId, UserId};
use crate::domain::ticket::{Ticket, TicketStatus};
use crate::ports::TicketRepository;

/// In-memory ticket store.
#[derive(Default)]
pub struct InMemoryTicketRepository {
    tickets: Mutex<Vec<Ticket>>,
}

impl InMemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a ticket, for test setup.
    pub fn seed(&self, ticket: Ticket) {
        self.tickets.lock().unwrap().push(ticket);
    }

    fn newest_first(mut tickets: Vec<Ticket>) -> Vec<Ticket> {
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tickets
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn insert(&self, ticket: &Ticket) -> Result<(), DomainError> {
        self.tickets.lock().unwrap().push(ticket.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, DomainError> {
        Ok(self
            .tickets
            .lock()
            .unwrap()
            .iter()
            .find(|t| &t.id == id)
            .cloned())
    }

    async fn find_owned(
        &self,
        id: &TicketId,
        creator: &UserId,
    ) -> Result<Option<Ticket>, DomainError> {
        Ok(self
            .tickets
            .lock()
            .unwrap()
            .iter()
            .find(|t| &t.id == id && &t.created_by == creator)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Ticket>, DomainError> {
        Ok(Self::newest_first(self.tickets.lock().unwrap().clone()))
    }

    async fn list_for_creator(&self, creator: &UserId) -> Result<Vec<Ticket>, DomainError> {
        let tickets = self
            .tickets
            .lock()
            .unwrap()
            .iter()
            .filter(|t| &t.created_by == creator)
            .cloned()
            .collect();
        Ok(Self::newest_first(tickets))
    }

    async fn list_assigned_open(&self, assignee: &UserId) -> Result<Vec<Ticket>, DomainError> {
        let tickets = self
            .tickets
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.assigned_to.as_ref() == Some(assignee) && !t.status.is_resolved())
            .cloned()
            .collect();
        Ok(Self::newest_first(tickets))
    }

    async fn update(&self, ticket: &Ticket) -> Result<(), DomainError> {
        let mut tickets = self.tickets.lock().unwrap();
        let slot = tickets
            .iter_mut()
            .find(|t| t.id == ticket.id)
            .ok_or_else(|| DomainError::new(ErrorCode::TicketNotFound, "Ticket not found"))?;
        *slot = ticket.clone();
        Ok(())
    }

    async fn mark_analyzing(&self, id: &TicketId) -> Result<(), DomainError> {
        let mut tickets = self.tickets.lock().unwrap();
        if let Some(ticket) = tickets.iter_mut().find(|t| &t.id == id) {
            ticket.status = TicketStatus::Analyzing;
        }
        Ok(())
    }

    async fn apply_analysis(
        &self,
        id: &TicketId,
        analysis: &TicketAnalysis,
    ) -> Result<(), DomainError> {
        let mut tickets = self.tickets.lock().unwrap();
        if let Some(ticket) = tickets.iter_mut().find(|t| &t.id == id) {
            ticket.summary = analysis.summary.clone();
            ticket.priority = Some(analysis.priority);
            ticket.helpful_notes = analysis.helpful_notes.clone();
            ticket.related_skills = analysis.related_skills.clone();
            ticket.status = TicketStatus::Pending;
        }
        Ok(())
    }

    async fn assign(&self, id: &TicketId, assignee: Option<&UserId>) -> Result<(), DomainError> {
        let mut tickets = self.tickets.lock().unwrap();
        if let Some(ticket) = tickets.iter_mut().find(|t| &t.id == id) {
            ticket.assigned_to = assignee.copied();
        }
        Ok(())
    }

    async fn delete(&self, id: &TicketId) -> Result<(), DomainError> {
        self.tickets.lock().unwrap().retain(|t| &t.id != id);
        Ok(())
    }
}
