//! In-memory implementation of PaymentRepository.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, PaymentId, Timestamp, UserId};
use crate::domain::payment::{Payment, PaymentStatus};
use crate::ports::PaymentRepository;

/// In-memory payment store. `mark_verified`/`mark_failed` perform the
/// status check and the write under one lock, matching the SQL adapter's
/// conditional updates.
#[derive(Default)]
pub struct InMemoryPaymentRepository {
    payments: Mutex<Vec<Payment>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a payment, for test setup.
    pub fn seed(&self, payment: Payment) {
        self.payments.lock().unwrap().push(payment);
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut payments = self.payments.lock().unwrap();
        if payments
            .iter()
            .any(|p| p.gateway_order_id == payment.gateway_order_id)
        {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Duplicate gateway order id",
            ));
        }
        payments.push(payment.clone());
        Ok(())
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Payment>, DomainError> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.gateway_order_id == order_id)
            .cloned())
    }

    async fn mark_verified(
        &self,
        id: &PaymentId,
        gateway_payment_id: &str,
        signature: Option<&str>,
        credits: i32,
    ) -> Result<bool, DomainError> {
        let mut payments = self.payments.lock().unwrap();
        let payment = match payments
            .iter_mut()
            .find(|p| &p.id == id && !p.status.is_verified())
        {
            Some(p) => p,
            None => return Ok(false),
        };
        payment.status = PaymentStatus::Verified;
        payment.gateway_payment_id = Some(gateway_payment_id.to_string());
        payment.signature = signature.map(|s| s.to_string());
        payment.credits_added = credits;
        payment.verified_at = Some(Timestamp::now());
        Ok(true)
    }

    async fn mark_failed(
        &self,
        id: &PaymentId,
        gateway_payment_id: Option<&str>,
        reason: &str,
    ) -> Result<bool, DomainError> {
        let mut payments = self.payments.lock().unwrap();
        let payment = match payments
            .iter_mut()
            .find(|p| &p.id == id && !p.status.is_verified())
        {
            Some(p) => p,
            None => return Ok(false),
        };
        payment.status = PaymentStatus::Failed;
        if let Some(pid) = gateway_payment_id {
            payment.gateway_payment_id = Some(pid.to_string());
        }
        payment.failure_reason = Some(reason.to_string());
        Ok(true)
    }

    async fn list_recent_for_user(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<Payment>, DomainError> {
        let mut payments: Vec<Payment> = self
            .payments
            .lock()
            .unwrap()
            .iter()
            .filter(|p| &p.user_id == user_id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        payments.truncate(limit as usize);
        Ok(payments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn seeded(repo: &InMemoryPaymentRepository) -> Payment {
        let payment = Payment::created_order(UserId::new(), "order_1", 49_900, "INR", "starter");
        repo.seed(payment.clone());
        payment
    }

    #[tokio::test]
    async fn mark_verified_wins_once() {
        let repo = InMemoryPaymentRepository::new();
        let payment = seeded(&repo);

        assert!(repo.mark_verified(&payment.id, "pay_1", None, 25).await.unwrap());
        assert!(!repo.mark_verified(&payment.id, "pay_2", None, 25).await.unwrap());

        let stored = repo.find_by_order_id("order_1").await.unwrap().unwrap();
        assert_eq!(stored.gateway_payment_id.as_deref(), Some("pay_1"));
        assert_eq!(stored.credits_added, 25);
    }

    #[tokio::test]
    async fn concurrent_verifications_admit_exactly_one() {
        let repo = Arc::new(InMemoryPaymentRepository::new());
        let payment = seeded(&repo);
        let id = payment.id;

        let a = {
            let repo = repo.clone();
            tokio::spawn(async move { repo.mark_verified(&id, "pay_a", None, 25).await.unwrap() })
        };
        let b = {
            let repo = repo.clone();
            tokio::spawn(async move { repo.mark_verified(&id, "pay_b", None, 25).await.unwrap() })
        };

        let wins = [a.await.unwrap(), b.await.unwrap()]
            .iter()
            .filter(|w| **w)
            .count();
        assert_eq!(wins, 1);
    }

    #[tokio::test]
    async fn mark_failed_never_downgrades_verified() {
        let repo = InMemoryPaymentRepository::new();
        let payment = seeded(&repo);

        repo.mark_verified(&payment.id, "pay_1", None, 25).await.unwrap();
        assert!(!repo.mark_failed(&payment.id, None, "card declined").await.unwrap());

        let stored = repo.find_by_order_id("order_1").await.unwrap().unwrap();
        assert!(stored.status.is_verified());
    }

    #[tokio::test]
    async fn list_recent_is_newest_first_and_limited() {
        let repo = InMemoryPaymentRepository::new();
        let user = UserId::new();
        for i in 0..5 {
            let mut p = Payment::created_order(user, format!("order_{i}"), 100, "INR", "p");
            p.created_at = Timestamp::now().minus_secs(100 - i);
            repo.seed(p);
        }

        let recent = repo.list_recent_for_user(&user, 3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].gateway_order_id, "order_4");
    }
}
