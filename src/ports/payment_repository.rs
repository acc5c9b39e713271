//! Payment repository port.
//!
//! The verified/failed transitions are guarded writes: the predicate
//! excludes already-verified rows so a payment can transition into
//! `verified` at most once, no matter how many callers race.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PaymentId, UserId};
use crate::domain::payment::Payment;

/// Port for payment persistence.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError>;

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Payment>, DomainError>;

    /// Transitions a payment to `verified`, recording the gateway payment
    /// id, optional signature, and credit grant — but only where the row
    /// is not already verified. Returns whether this call won the
    /// transition; `false` means a concurrent verification already did.
    async fn mark_verified(
        &self,
        id: &PaymentId,
        gateway_payment_id: &str,
        signature: Option<&str>,
        credits: i32,
    ) -> Result<bool, DomainError>;

    /// Transitions a payment to `failed` with a reason, only where the
    /// row is not already verified (a verified payment is never
    /// overwritten). Returns whether a row changed.
    async fn mark_failed(
        &self,
        id: &PaymentId,
        gateway_payment_id: Option<&str>,
        reason: &str,
    ) -> Result<bool, DomainError>;

    /// Most recent payments for a user, newest first.
    async fn list_recent_for_user(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<Payment>, DomainError>;
}
