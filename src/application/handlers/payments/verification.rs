//! The guarded verified-transition + ledger-credit sequence.
//!
//! Written once and invoked from both entry points (client-submitted
//! verification and the webhook). The payment-side conditional update
//! decides the winner; only the winner credits the ledger, so replays and
//! concurrent verifications credit exactly once.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::payment::Payment;
use crate::domain::user::{CreditSnapshot, PaymentHistoryEntry};
use crate::ports::{PaymentRepository, UserRepository};

/// Outcome of a verification attempt.
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    /// `true` when another verification already won; the ledger was not
    /// touched by this call.
    pub duplicate: bool,
    pub user: Option<CreditSnapshot>,
}

/// Applies the verified transition and, if this call won it, the ledger
/// credit.
pub async fn finalize_verified(
    users: &Arc<dyn UserRepository>,
    payments: &Arc<dyn PaymentRepository>,
    payment: &Payment,
    gateway_payment_id: &str,
    signature: Option<&str>,
    credits: i32,
) -> Result<VerificationOutcome, DomainError> {
    if payment.status.is_verified() {
        let user = users.credit_snapshot(&payment.user_id).await?;
        return Ok(VerificationOutcome {
            duplicate: true,
            user,
        });
    }

    let won = payments
        .mark_verified(&payment.id, gateway_payment_id, signature, credits)
        .await?;

    if !won {
        // A concurrent verification got there first; report success, not
        // an error, and do not re-credit.
        let user = users.credit_snapshot(&payment.user_id).await?;
        return Ok(VerificationOutcome {
            duplicate: true,
            user,
        });
    }

    let entry = PaymentHistoryEntry {
        gateway_payment_id: gateway_payment_id.to_string(),
        gateway_order_id: payment.gateway_order_id.clone(),
        amount: payment.amount,
        currency: payment.currency.clone(),
        credits_added: credits,
        verified_at: Timestamp::now(),
    };
    let user = users
        .credit_verified_payment(&payment.user_id, credits, &entry)
        .await?;

    Ok(VerificationOutcome {
        duplicate: false,
        user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryPaymentRepository, InMemoryUserRepository};
    use crate::domain::user::User;

    fn fixture() -> (
        Arc<dyn UserRepository>,
        Arc<dyn PaymentRepository>,
        Arc<InMemoryUserRepository>,
        Arc<InMemoryPaymentRepository>,
        Payment,
    ) {
        let users = Arc::new(InMemoryUserRepository::new());
        let payments = Arc::new(InMemoryPaymentRepository::new());
        let user = User::signup("payer@x.test", "h", vec![]);
        let payment = Payment::created_order(user.id, "order_1", 49_900, "INR", "starter");
        users.seed(user);
        payments.seed(payment.clone());
        (
            users.clone() as Arc<dyn UserRepository>,
            payments.clone() as Arc<dyn PaymentRepository>,
            users,
            payments,
            payment,
        )
    }

    #[tokio::test]
    async fn first_verification_credits_the_ledger() {
        let (users, payments, _, _, payment) = fixture();

        let outcome = finalize_verified(&users, &payments, &payment, "pay_1", None, 25)
            .await
            .unwrap();

        assert!(!outcome.duplicate);
        assert_eq!(outcome.user.unwrap().credits_remaining, 30);
    }

    #[tokio::test]
    async fn second_verification_is_duplicate_without_recredit() {
        let (users, payments, _, payments_mem, payment) = fixture();

        finalize_verified(&users, &payments, &payment, "pay_1", None, 25)
            .await
            .unwrap();

        // Re-read so the stale in-memory copy does not mask the guard.
        let fresh = payments_mem
            .find_by_order_id("order_1")
            .await
            .unwrap()
            .unwrap();
        let outcome = finalize_verified(&users, &payments, &fresh, "pay_2", None, 25)
            .await
            .unwrap();

        assert!(outcome.duplicate);
        assert_eq!(outcome.user.unwrap().credits_remaining, 30);
    }

    #[tokio::test]
    async fn stale_snapshot_still_credits_once() {
        let (users, payments, _, _, payment) = fixture();

        // Two calls race with the same pre-verification snapshot; the
        // conditional update admits exactly one.
        let first = finalize_verified(&users, &payments, &payment, "pay_1", None, 25)
            .await
            .unwrap();
        let second = finalize_verified(&users, &payments, &payment, "pay_2", None, 25)
            .await
            .unwrap();

        assert!(!first.duplicate);
        assert!(second.duplicate);
        assert_eq!(second.user.unwrap().credits_remaining, 30);
    }
}
