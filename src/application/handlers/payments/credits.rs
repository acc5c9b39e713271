//! Credit balance and payment history queries.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Principal};
use crate::domain::payment::Payment;
use crate::domain::user::CreditSnapshot;
use crate::ports::{PaymentRepository, UserRepository};

/// Payments returned by the history endpoint.
const HISTORY_LIMIT: i64 = 20;

/// The caller's credit balance plus identity for display.
#[derive(Debug, Clone)]
pub struct CreditsView {
    pub email: String,
    pub snapshot: CreditSnapshot,
}

/// Handler for the credits endpoint.
pub struct GetCreditsHandler {
    users: Arc<dyn UserRepository>,
}

impl GetCreditsHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, principal: &Principal) -> Result<CreditsView, DomainError> {
        let user = self
            .users
            .find_by_id(&principal.user_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "User not found"))?;

        Ok(CreditsView {
            email: user.email.clone(),
            snapshot: CreditSnapshot {
                credits_remaining: user.credits_remaining,
                credits_used: user.credits_used,
                subscription_status: user.subscription_status,
            },
        })
    }
}

/// Handler for the payment-history endpoint.
pub struct PaymentHistoryHandler {
    payments: Arc<dyn PaymentRepository>,
}

impl PaymentHistoryHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }

    pub async fn handle(&self, principal: &Principal) -> Result<Vec<Payment>, DomainError> {
        self.payments
            .list_recent_for_user(&principal.user_id, HISTORY_LIMIT)
            .await
    }
}
