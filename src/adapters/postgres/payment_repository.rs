//! PostgreSQL implementation of PaymentRepository.
//!
//! The verified and failed transitions are single conditional UPDATEs
//! excluding already-verified rows; `rows_affected()` tells the caller
//! whether it won the transition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, PaymentId, Timestamp, UserId};
use crate::domain::payment::{Payment, PaymentStatus};
use crate::ports::PaymentRepository;

/// PostgreSQL implementation of the PaymentRepository port.
pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a payment.
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    user_id: Uuid,
    gateway_order_id: String,
    gateway_payment_id: Option<String>,
    signature: Option<String>,
    amount: i64,
    currency: String,
    status: String,
    credits_added: i32,
    plan_id: String,
    verified_at: Option<DateTime<Utc>>,
    failure_reason: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let status = PaymentStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid payment status value: {}", row.status),
            )
        })?;

        Ok(Payment {
            id: PaymentId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            gateway_order_id: row.gateway_order_id,
            gateway_payment_id: row.gateway_payment_id,
            signature: row.signature,
            amount: row.amount,
            currency: row.currency,
            status,
            credits_added: row.credits_added,
            plan_id: row.plan_id,
            verified_at: row.verified_at.map(Timestamp::from_datetime),
            failure_reason: row.failure_reason,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

const PAYMENT_COLUMNS: &str = "id, user_id, gateway_order_id, gateway_payment_id, signature, \
     amount, currency, status, credits_added, plan_id, verified_at, failure_reason, created_at";

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, user_id, gateway_order_id, gateway_payment_id, signature,
                amount, currency, status, credits_added, plan_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.user_id.as_uuid())
        .bind(&payment.gateway_order_id)
        .bind(&payment.gateway_payment_id)
        .bind(&payment.signature)
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(payment.status.as_str())
        .bind(payment.credits_added)
        .bind(&payment.plan_id)
        .bind(payment.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert payment", e))?;

        Ok(())
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE gateway_order_id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find payment", e))?;

        row.map(Payment::try_from).transpose()
    }

    async fn mark_verified(
        &self,
        id: &PaymentId,
        gateway_payment_id: &str,
        signature: Option<&str>,
        credits: i32,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payments SET
                status = 'verified',
                gateway_payment_id = $2,
                signature = $3,
                credits_added = $4,
                verified_at = now()
            WHERE id = $1 AND status <> 'verified'
            "#,
        )
        .bind(id.as_uuid())
        .bind(gateway_payment_id)
        .bind(signature)
        .bind(credits)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to mark payment verified", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_failed(
        &self,
        id: &PaymentId,
        gateway_payment_id: Option<&str>,
        reason: &str,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payments SET
                status = 'failed',
                gateway_payment_id = COALESCE($2, gateway_payment_id),
                failure_reason = $3
            WHERE id = $1 AND status <> 'verified'
            "#,
        )
        .bind(id.as_uuid())
        .bind(gateway_payment_id)
        .bind(reason)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to mark payment failed", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_recent_for_user(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<Payment>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments \
             WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(user_id.as_uuid())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list payments", e))?;

        rows.into_iter().map(Payment::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_row_parses_status() {
        let row = PaymentRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            gateway_order_id: "order_1".to_string(),
            gateway_payment_id: Some("pay_1".to_string()),
            signature: None,
            amount: 49_900,
            currency: "INR".to_string(),
            status: "verified".to_string(),
            credits_added: 25,
            plan_id: "starter-monthly".to_string(),
            verified_at: Some(Utc::now()),
            failure_reason: None,
            created_at: Utc::now(),
        };
        let payment = Payment::try_from(row).unwrap();
        assert!(payment.status.is_verified());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let row = PaymentRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            gateway_order_id: "order_1".to_string(),
            gateway_payment_id: None,
            signature: None,
            amount: 1,
            currency: "INR".to_string(),
            status: "refunded".to_string(),
            credits_added: 0,
            plan_id: "p".to_string(),
            verified_at: None,
            failure_reason: None,
            created_at: Utc::now(),
        };
        assert!(Payment::try_from(row).is_err());
    }
}
