//! PostgreSQL implementation of TicketRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::analysis::{Priority, TicketAnalysis};
use crate::domain::foundation::{DomainError, ErrorCode, TicketId, Timestamp, UserId};
use crate::domain::ticket::{Ticket, TicketStatus};
use crate::ports::TicketRepository;

/// PostgreSQL implementation of the TicketRepository port.
pub struct PostgresTicketRepository {
    pool: PgPool,
}

impl PostgresTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a ticket.
#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    title: String,
    description: String,
    summary: String,
    priority: Option<String>,
    helpful_notes: String,
    related_skills: Vec<String>,
    status: String,
    created_by: Uuid,
    assigned_to: Option<Uuid>,
    resolved_by: Option<Uuid>,
    resolved_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = DomainError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let status = TicketStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid ticket status value: {}", row.status),
            )
        })?;
        let priority = row
            .priority
            .as_deref()
            .map(|p| {
                Priority::parse(p).ok_or_else(|| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Invalid priority value: {}", p),
                    )
                })
            })
            .transpose()?;

        Ok(Ticket {
            id: TicketId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            summary: row.summary,
            priority,
            helpful_notes: row.helpful_notes,
            related_skills: row.related_skills,
            status,
            created_by: UserId::from_uuid(row.created_by),
            assigned_to: row.assigned_to.map(UserId::from_uuid),
            resolved_by: row.resolved_by.map(UserId::from_uuid),
            resolved_at: row.resolved_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

const TICKET_COLUMNS: &str = "id, title, description, summary, priority, helpful_notes, \
     related_skills, status, created_by, assigned_to, resolved_by, resolved_at, created_at";

#[async_trait]
impl TicketRepository for PostgresTicketRepository {
    async fn insert(&self, ticket: &Ticket) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO tickets (
                id, title, description, summary, priority, helpful_notes,
                related_skills, status, created_by, assigned_to, resolved_by,
                resolved_at, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(ticket.id.as_uuid())
        .bind(&ticket.title)
        .bind(&ticket.description)
        .bind(&ticket.summary)
        .bind(ticket.priority.map(|p| p.as_str()))
        .bind(&ticket.helpful_notes)
        .bind(&ticket.related_skills)
        .bind(ticket.status.as_str())
        .bind(ticket.created_by.as_uuid())
        .bind(ticket.assigned_to.as_ref().map(|u| *u.as_uuid()))
        .bind(ticket.resolved_by.as_ref().map(|u| *u.as_uuid()))
        .bind(ticket.resolved_at.as_ref().map(|t| *t.as_datetime()))
        .bind(ticket.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert ticket", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, DomainError> {
        let row: Option<TicketRow> =
            sqlx::query_as(&format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("Failed to find ticket", e))?;

        row.map(Ticket::try_from).transpose()
    }

    async fn find_owned(
        &self,
        id: &TicketId,
        creator: &UserId,
    ) -> Result<Option<Ticket>, DomainError> {
        let row: Option<TicketRow> = sqlx::query_as(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1 AND created_by = $2"
        ))
        .bind(id.as_uuid())
        .bind(creator.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find ticket", e))?;

        row.map(Ticket::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Ticket>, DomainError> {
        let rows: Vec<TicketRow> = sqlx::query_as(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list tickets", e))?;

        rows.into_iter().map(Ticket::try_from).collect()
    }

    async fn list_for_creator(&self, creator: &UserId) -> Result<Vec<Ticket>, DomainError> {
        let rows: Vec<TicketRow> = sqlx::query_as(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets \
             WHERE created_by = $1 ORDER BY created_at DESC"
        ))
        .bind(creator.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list tickets", e))?;

        rows.into_iter().map(Ticket::try_from).collect()
    }

    async fn list_assigned_open(&self, assignee: &UserId) -> Result<Vec<Ticket>, DomainError> {
        let rows: Vec<TicketRow> = sqlx::query_as(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets \
             WHERE assigned_to = $1 AND status <> 'RESOLVED' \
             ORDER BY created_at DESC"
        ))
        .bind(assignee.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list assigned tickets", e))?;

        rows.into_iter().map(Ticket::try_from).collect()
    }

    async fn update(&self, ticket: &Ticket) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE tickets SET
                title = $2,
                description = $3,
                summary = $4,
                priority = $5,
                helpful_notes = $6,
                related_skills = $7,
                status = $8,
                assigned_to = $9,
                resolved_by = $10,
                resolved_at = $11
            WHERE id = $1
            "#,
        )
        .bind(ticket.id.as_uuid())
        .bind(&ticket.title)
        .bind(&ticket.description)
        .bind(&ticket.summary)
        .bind(ticket.priority.map(|p| p.as_str()))
        .bind(&ticket.helpful_notes)
        .bind(&ticket.related_skills)
        .bind(ticket.status.as_str())
        .bind(ticket.assigned_to.as_ref().map(|u| *u.as_uuid()))
        .bind(ticket.resolved_by.as_ref().map(|u| *u.as_uuid()))
        .bind(ticket.resolved_at.as_ref().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update ticket", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::TicketNotFound, "Ticket not found"));
        }
        Ok(())
    }

    async fn mark_analyzing(&self, id: &TicketId) -> Result<(), DomainError> {
        sqlx::query("UPDATE tickets SET status = 'TODO' WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to mark ticket analyzing", e))?;

        Ok(())
    }

    async fn apply_analysis(
        &self,
        id: &TicketId,
        analysis: &TicketAnalysis,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE tickets SET
                summary = $2,
                priority = $3,
                helpful_notes = $4,
                related_skills = $5,
                status = 'PENDING'
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(&analysis.summary)
        .bind(analysis.priority.as_str())
        .bind(&analysis.helpful_notes)
        .bind(&analysis.related_skills)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to apply analysis", e))?;

        Ok(())
    }

    async fn assign(&self, id: &TicketId, assignee: Option<&UserId>) -> Result<(), DomainError> {
        sqlx::query("UPDATE tickets SET assigned_to = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(assignee.map(|u| *u.as_uuid()))
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to assign ticket", e))?;

        Ok(())
    }

    async fn delete(&self, id: &TicketId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete ticket", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::TicketNotFound, "Ticket not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_row_roundtrips_status_strings() {
        let row = TicketRow {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: "d".to_string(),
            summary: String::new(),
            priority: Some("high".to_string()),
            helpful_notes: String::new(),
            related_skills: vec![],
            status: "PENDING".to_string(),
            created_by: Uuid::new_v4(),
            assigned_to: None,
            resolved_by: None,
            resolved_at: None,
            created_at: Utc::now(),
        };
        let ticket = Ticket::try_from(row).unwrap();
        assert_eq!(ticket.status, TicketStatus::Pending);
        assert_eq!(ticket.priority, Some(Priority::High));
    }

    #[test]
    fn invalid_status_is_a_database_error() {
        let row = TicketRow {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: "d".to_string(),
            summary: String::new(),
            priority: None,
            helpful_notes: String::new(),
            related_skills: vec![],
            status: "LIMBO".to_string(),
            created_by: Uuid::new_v4(),
            assigned_to: None,
            resolved_by: None,
            resolved_at: None,
            created_at: Utc::now(),
        };
        assert!(Ticket::try_from(row).is_err());
    }
}
