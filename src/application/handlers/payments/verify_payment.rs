//! VerifyPaymentHandler - client-submitted checkout verification.
//!
//! Live mode checks the HMAC signature over `order_id|payment_id`; mock
//! mode accepts any order with the mock prefix but only when mock mode
//! was explicitly configured. Both funnel into the shared guarded
//! transition, so replays report `duplicate` and credit nothing.

use std::sync::Arc;

use secrecy::ExposeSecret;

use super::verification::{finalize_verified, VerificationOutcome};
use crate::config::PaymentConfig;
use crate::domain::foundation::{DomainError, ErrorCode, Principal, Timestamp};
use crate::domain::payment::{
    verify_checkout_signature, Payment, MOCK_ORDER_PREFIX, MOCK_PAYMENT_PREFIX,
};
use crate::ports::{PaymentRepository, UserRepository};

/// Command carrying the client's verification proof.
#[derive(Debug, Clone, Default)]
pub struct VerifyPaymentCommand {
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub signature: Option<String>,
}

/// Result of a verification.
#[derive(Debug, Clone)]
pub struct VerifyPaymentResult {
    pub duplicate: bool,
    pub user: Option<crate::domain::user::CreditSnapshot>,
    pub order_id: String,
    pub payment_id: String,
}

/// Handler for the verify endpoint.
pub struct VerifyPaymentHandler {
    users: Arc<dyn UserRepository>,
    payments: Arc<dyn PaymentRepository>,
    config: PaymentConfig,
}

impl VerifyPaymentHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        payments: Arc<dyn PaymentRepository>,
        config: PaymentConfig,
    ) -> Self {
        Self {
            users,
            payments,
            config,
        }
    }

    pub async fn handle(
        &self,
        principal: &Principal,
        cmd: VerifyPaymentCommand,
    ) -> Result<VerifyPaymentResult, DomainError> {
        if self.config.is_mock() {
            self.handle_mock(principal, cmd).await
        } else {
            self.handle_live(principal, cmd).await
        }
    }

    async fn handle_mock(
        &self,
        principal: &Principal,
        cmd: VerifyPaymentCommand,
    ) -> Result<VerifyPaymentResult, DomainError> {
        let order_id = cmd
            .order_id
            .filter(|id| id.starts_with(MOCK_ORDER_PREFIX))
            .ok_or_else(|| DomainError::validation("Invalid mock order id."))?;

        let payment = self
            .payments
            .find_by_order_id(&order_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::PaymentNotFound, "Mock payment order not found.")
            })?;
        self.check_ownership(principal, &payment)?;

        let payment_id = format!("{MOCK_PAYMENT_PREFIX}{}", Timestamp::now().as_unix_millis());
        let outcome = finalize_verified(
            &self.users,
            &self.payments,
            &payment,
            &payment_id,
            Some("mock_signature"),
            self.config.subscription_credits,
        )
        .await?;

        Ok(Self::result(outcome, order_id, payment_id))
    }

    async fn handle_live(
        &self,
        principal: &Principal,
        cmd: VerifyPaymentCommand,
    ) -> Result<VerifyPaymentResult, DomainError> {
        let (order_id, payment_id, signature) = match (cmd.order_id, cmd.payment_id, cmd.signature)
        {
            (Some(o), Some(p), Some(s)) if !o.is_empty() && !p.is_empty() && !s.is_empty() => {
                (o, p, s)
            }
            _ => {
                return Err(DomainError::validation(
                    "Missing payment verification fields.",
                ))
            }
        };

        let key_secret = self.config.key_secret.expose_secret();
        if !verify_checkout_signature(key_secret, &order_id, &payment_id, &signature) {
            // Deliberately generic: which part failed is not disclosed.
            return Err(DomainError::new(
                ErrorCode::InvalidSignature,
                "Invalid payment signature.",
            ));
        }

        let payment = self
            .payments
            .find_by_order_id(&order_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::PaymentNotFound, "Payment order not found.")
            })?;
        self.check_ownership(principal, &payment)?;

        let outcome = finalize_verified(
            &self.users,
            &self.payments,
            &payment,
            &payment_id,
            Some(&signature),
            self.config.subscription_credits,
        )
        .await?;

        Ok(Self::result(outcome, order_id, payment_id))
    }

    fn check_ownership(&self, principal: &Principal, payment: &Payment) -> Result<(), DomainError> {
        if payment.user_id != principal.user_id {
            return Err(DomainError::forbidden(
                "Payment does not belong to current user.",
            ));
        }
        Ok(())
    }

    fn result(
        outcome: VerificationOutcome,
        order_id: String,
        payment_id: String,
    ) -> VerifyPaymentResult {
        VerifyPaymentResult {
            duplicate: outcome.duplicate,
            user: outcome.user,
            order_id,
            payment_id,
        }
    }
}
