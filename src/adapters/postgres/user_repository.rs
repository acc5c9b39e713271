//! PostgreSQL implementation of UserRepository.
//!
//! Ledger mutations are single conditional UPDATEs whose predicates
//! re-check the precondition at write time; `rows_affected()` /
//! `RETURNING` decide whether the guarded write won.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, Role, TicketId, Timestamp, UserId};
use crate::domain::triage::AssigneeCandidate;
use crate::domain::user::{
    CreditSnapshot, PaymentHistoryEntry, ResolvedTicketEntry, SubscriptionStatus, User,
};
use crate::ports::UserRepository;

/// PostgreSQL implementation of the UserRepository port.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    skills: Vec<String>,
    issues_resolved: i32,
    score: i32,
    credits_remaining: i32,
    credits_used: i32,
    subscription_status: String,
    gateway_order_id: Option<String>,
    gateway_payment_id: Option<String>,
    reset_token_hash: Option<String>,
    reset_token_expires: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::from_uuid(row.id),
            email: row.email,
            password_hash: row.password_hash,
            role: parse_role(&row.role)?,
            skills: row.skills,
            issues_resolved: row.issues_resolved,
            score: row.score,
            credits_remaining: row.credits_remaining,
            credits_used: row.credits_used,
            subscription_status: parse_subscription(&row.subscription_status)?,
            gateway_order_id: row.gateway_order_id,
            gateway_payment_id: row.gateway_payment_id,
            reset_token_hash: row.reset_token_hash,
            reset_token_expires: row.reset_token_expires.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SnapshotRow {
    credits_remaining: i32,
    credits_used: i32,
    subscription_status: String,
}

impl TryFrom<SnapshotRow> for CreditSnapshot {
    type Error = DomainError;

    fn try_from(row: SnapshotRow) -> Result<Self, Self::Error> {
        Ok(CreditSnapshot {
            credits_remaining: row.credits_remaining,
            credits_used: row.credits_used,
            subscription_status: parse_subscription(&row.subscription_status)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CandidateRow {
    id: Uuid,
    email: String,
    role: String,
    skills: Vec<String>,
    issues_resolved: i32,
    score: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<CandidateRow> for AssigneeCandidate {
    type Error = DomainError;

    fn try_from(row: CandidateRow) -> Result<Self, Self::Error> {
        Ok(AssigneeCandidate {
            id: UserId::from_uuid(row.id),
            email: row.email,
            role: parse_role(&row.role)?,
            skills: row.skills,
            issues_resolved: row.issues_resolved,
            score: row.score,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    ticket_id: Option<Uuid>,
    title: String,
    resolved_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<HistoryRow> for ResolvedTicketEntry {
    fn from(row: HistoryRow) -> Self {
        ResolvedTicketEntry {
            ticket_id: row.ticket_id.map(TicketId::from_uuid),
            title: row.title,
            resolved_at: Timestamp::from_datetime(row.resolved_at),
            deleted_at: row.deleted_at.map(Timestamp::from_datetime),
        }
    }
}

fn parse_role(s: &str) -> Result<Role, DomainError> {
    Role::parse(s).ok_or_else(|| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid role value: {}", s))
    })
}

fn parse_subscription(s: &str) -> Result<SubscriptionStatus, DomainError> {
    SubscriptionStatus::parse(s).ok_or_else(|| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid subscription status value: {}", s),
        )
    })
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

const USER_COLUMNS: &str = "id, email, password_hash, role, skills, issues_resolved, score, \
     credits_remaining, credits_used, subscription_status, gateway_order_id, \
     gateway_payment_id, reset_token_hash, reset_token_expires, created_at";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: &User) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, password_hash, role, skills, issues_resolved, score,
                credits_remaining, credits_used, subscription_status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.skills)
        .bind(user.issues_resolved)
        .bind(user.score)
        .bind(user.credits_remaining)
        .bind(user.credits_used)
        .bind(user.subscription_status.as_str())
        .bind(user.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("users_email_key") {
                    return DomainError::new(
                        ErrorCode::DuplicateEmail,
                        "An account with this email already exists",
                    );
                }
            }
            db_error("Failed to insert user", e)
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("Failed to find user", e))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("Failed to find user by email", e))?;

        row.map(User::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("Failed to list users", e))?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update_role_and_skills(
        &self,
        email: &str,
        role: Role,
        skills: &[String],
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET role = $2, skills = $3 WHERE email = $1")
            .bind(email)
            .bind(role.as_str())
            .bind(skills)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update user", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::UserNotFound, "User not found"));
        }
        Ok(())
    }

    async fn debit_credit(&self, id: &UserId) -> Result<Option<CreditSnapshot>, DomainError> {
        // The predicate re-checks the balance at write time; two racing
        // debits of one remaining credit cannot both match.
        let row: Option<SnapshotRow> = sqlx::query_as(
            r#"
            UPDATE users
            SET credits_remaining = credits_remaining - 1,
                credits_used = credits_used + 1
            WHERE id = $1 AND credits_remaining > 0
            RETURNING credits_remaining, credits_used, subscription_status
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to debit credit", e))?;

        row.map(CreditSnapshot::try_from).transpose()
    }

    async fn refund_credit(&self, id: &UserId) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE users
            SET credits_remaining = credits_remaining + 1,
                credits_used = credits_used - 1
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to refund credit", e))?;

        Ok(())
    }

    async fn credit_verified_payment(
        &self,
        id: &UserId,
        credits: i32,
        entry: &PaymentHistoryEntry,
    ) -> Result<Option<CreditSnapshot>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to open transaction", e))?;

        let row: Option<SnapshotRow> = sqlx::query_as(
            r#"
            UPDATE users
            SET credits_remaining = credits_remaining + $2,
                subscription_status = 'active',
                gateway_order_id = $3,
                gateway_payment_id = $4
            WHERE id = $1
            RETURNING credits_remaining, credits_used, subscription_status
            "#,
        )
        .bind(id.as_uuid())
        .bind(credits)
        .bind(&entry.gateway_order_id)
        .bind(&entry.gateway_payment_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to credit payment", e))?;

        if row.is_some() {
            sqlx::query(
                r#"
                INSERT INTO payment_history (
                    user_id, gateway_payment_id, gateway_order_id,
                    amount, currency, credits_added, verified_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(id.as_uuid())
            .bind(&entry.gateway_payment_id)
            .bind(&entry.gateway_order_id)
            .bind(entry.amount)
            .bind(&entry.currency)
            .bind(entry.credits_added)
            .bind(entry.verified_at.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to append payment history", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit payment credit", e))?;

        row.map(CreditSnapshot::try_from).transpose()
    }

    async fn credit_snapshot(&self, id: &UserId) -> Result<Option<CreditSnapshot>, DomainError> {
        let row: Option<SnapshotRow> = sqlx::query_as(
            "SELECT credits_remaining, credits_used, subscription_status FROM users WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to read credit snapshot", e))?;

        row.map(CreditSnapshot::try_from).transpose()
    }

    async fn record_resolution(
        &self,
        id: &UserId,
        entry: &ResolvedTicketEntry,
        points: i32,
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to open transaction", e))?;

        // Replace any stale entry for the same ticket before appending.
        sqlx::query("DELETE FROM resolved_ticket_history WHERE user_id = $1 AND ticket_id = $2")
            .bind(id.as_uuid())
            .bind(entry.ticket_id.as_ref().map(|t| *t.as_uuid()))
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to clear stale history", e))?;

        sqlx::query(
            r#"
            INSERT INTO resolved_ticket_history (user_id, ticket_id, title, resolved_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id.as_uuid())
        .bind(entry.ticket_id.as_ref().map(|t| *t.as_uuid()))
        .bind(&entry.title)
        .bind(entry.resolved_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to append resolution history", e))?;

        sqlx::query(
            r#"
            UPDATE users
            SET issues_resolved = issues_resolved + 1, score = score + $2
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(points)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to apply resolution award", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit resolution", e))
    }

    async fn reverse_resolution(&self, id: &UserId, points: i32) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE users
            SET issues_resolved = issues_resolved - 1, score = score - $2
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(points)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to reverse resolution award", e))?;

        Ok(())
    }

    async fn mark_history_deleted(
        &self,
        resolver: &UserId,
        ticket_id: &TicketId,
        deleted_at: Timestamp,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE resolved_ticket_history
            SET deleted_at = $3
            WHERE user_id = $1 AND ticket_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(resolver.as_uuid())
        .bind(ticket_id.as_uuid())
        .bind(deleted_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to mark history deleted", e))?;

        Ok(())
    }

    async fn resolved_history(
        &self,
        id: &UserId,
    ) -> Result<Vec<ResolvedTicketEntry>, DomainError> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            r#"
            SELECT ticket_id, title, resolved_at, deleted_at
            FROM resolved_ticket_history
            WHERE user_id = $1
            ORDER BY resolved_at DESC
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to read resolution history", e))?;

        Ok(rows.into_iter().map(ResolvedTicketEntry::from).collect())
    }

    async fn set_reset_token(
        &self,
        id: &UserId,
        token_hash: &str,
        expires: Timestamp,
    ) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE users SET reset_token_hash = $2, reset_token_expires = $3 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(token_hash)
        .bind(expires.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to set reset token", e))?;

        Ok(())
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: Timestamp,
    ) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE reset_token_hash = $1 AND reset_token_expires > $2"
        ))
        .bind(token_hash)
        .bind(now.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find user by reset token", e))?;

        row.map(User::try_from).transpose()
    }

    async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, reset_token_hash = NULL, reset_token_expires = NULL
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update password", e))?;

        Ok(())
    }

    async fn moderator_candidates(&self) -> Result<Vec<AssigneeCandidate>, DomainError> {
        self.candidates_with_role("moderator").await
    }

    async fn admin_candidates(&self) -> Result<Vec<AssigneeCandidate>, DomainError> {
        self.candidates_with_role("admin").await
    }

    async fn candidate(&self, id: &UserId) -> Result<Option<AssigneeCandidate>, DomainError> {
        let row: Option<CandidateRow> = sqlx::query_as(
            r#"
            SELECT id, email, role, skills, issues_resolved, score, created_at
            FROM users WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find candidate", e))?;

        row.map(AssigneeCandidate::try_from).transpose()
    }
}

impl PostgresUserRepository {
    async fn candidates_with_role(
        &self,
        role: &str,
    ) -> Result<Vec<AssigneeCandidate>, DomainError> {
        let rows: Vec<CandidateRow> = sqlx::query_as(
            r#"
            SELECT id, email, role, skills, issues_resolved, score, created_at
            FROM users WHERE role = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list candidates", e))?;

        rows.into_iter().map(AssigneeCandidate::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_role_accepts_stored_values() {
        assert_eq!(parse_role("user").unwrap(), Role::User);
        assert_eq!(parse_role("moderator").unwrap(), Role::Moderator);
        assert_eq!(parse_role("admin").unwrap(), Role::Admin);
        assert!(parse_role("root").is_err());
    }

    #[test]
    fn parse_subscription_accepts_stored_values() {
        assert_eq!(
            parse_subscription("inactive").unwrap(),
            SubscriptionStatus::Inactive
        );
        assert_eq!(
            parse_subscription("active").unwrap(),
            SubscriptionStatus::Active
        );
        assert_eq!(
            parse_subscription("past_due").unwrap(),
            SubscriptionStatus::PastDue
        );
        assert!(parse_subscription("trial").is_err());
    }

    #[test]
    fn history_row_maps_to_entry() {
        let row = HistoryRow {
            ticket_id: Some(Uuid::new_v4()),
            title: "t".to_string(),
            resolved_at: Utc::now(),
            deleted_at: None,
        };
        let entry = ResolvedTicketEntry::from(row);
        assert!(entry.ticket_id.is_some());
        assert!(entry.deleted_at.is_none());
    }
}
