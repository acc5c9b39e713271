//! HandleWebhookHandler - inbound gateway webhooks.
//!
//! Delivery is at-least-once. Only an unauthenticated or malformed
//! request is rejected; every business-level oddity (unknown event,
//! missing order id, unknown order, replay) is acknowledged with 200 so
//! the sender stops retrying.

use std::sync::Arc;

use secrecy::ExposeSecret;

use super::verification::finalize_verified;
use crate::config::PaymentConfig;
use crate::domain::foundation::DomainError;
use crate::domain::payment::{parse_webhook_event, verify_webhook_signature, WebhookKind};
use crate::ports::{PaymentRepository, UserRepository};

/// Default failure reason when the gateway supplies none.
const DEFAULT_FAILURE_REASON: &str = "payment_failed";

/// How a webhook was disposed of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// 400: missing/invalid signature or unparseable body.
    Rejected { message: String },
    /// 200: processed, ignored, or replayed.
    Acknowledged { ignored: bool, duplicate: bool },
}

impl WebhookOutcome {
    fn rejected(message: impl Into<String>) -> Self {
        WebhookOutcome::Rejected {
            message: message.into(),
        }
    }

    fn processed() -> Self {
        WebhookOutcome::Acknowledged {
            ignored: false,
            duplicate: false,
        }
    }

    fn ignored() -> Self {
        WebhookOutcome::Acknowledged {
            ignored: true,
            duplicate: false,
        }
    }

    fn duplicate() -> Self {
        WebhookOutcome::Acknowledged {
            ignored: false,
            duplicate: true,
        }
    }
}

/// Handler for the webhook endpoint.
pub struct HandleWebhookHandler {
    users: Arc<dyn UserRepository>,
    payments: Arc<dyn PaymentRepository>,
    config: PaymentConfig,
}

impl HandleWebhookHandler {
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
        raw_body: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookOutcome, DomainError> {
        let secret = self.config.webhook_secret.expose_secret();
        let signature = match signature {
            Some(s) if !secret.is_empty() => s,
            _ => return Ok(WebhookOutcome::rejected("Missing webhook signature/secret.")),
        };

        if !verify_webhook_signature(secret, raw_body, signature) {
            return Ok(WebhookOutcome::rejected("Invalid webhook signature."));
        }

        let event = match parse_webhook_event(raw_body) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "webhook body unparseable");
                return Ok(WebhookOutcome::rejected("Malformed webhook payload."));
            }
        };

        let order_id = match (&event.kind, &event.order_id) {
            (WebhookKind::Other, _) | (_, None) => return Ok(WebhookOutcome::ignored()),
            (_, Some(order_id)) => order_id.clone(),
        };

        let payment = match self.payments.find_by_order_id(&order_id).await? {
            Some(payment) => payment,
            None => return Ok(WebhookOutcome::ignored()),
        };

        match event.kind {
            WebhookKind::PaymentFailed => {
                let reason = event
                    .error_description
                    .as_deref()
                    .unwrap_or(DEFAULT_FAILURE_REASON);
                // The guard refuses to overwrite a verified payment.
                self.payments
                    .mark_failed(&payment.id, event.payment_id.as_deref(), reason)
                    .await?;
                Ok(WebhookOutcome::processed())
            }
            WebhookKind::PaymentCaptured => {
                if payment.status.is_verified() {
                    return Ok(WebhookOutcome::duplicate());
                }
                let payment_id = event.payment_id.unwrap_or_default();
                let outcome = finalize_verified(
                    &self.users,
                    &self.payments,
                    &payment,
                    &payment_id,
                    None,
                    self.config.subscription_credits,
                )
                .await?;
                if outcome.duplicate {
                    Ok(WebhookOutcome::duplicate())
                } else {
                    Ok(WebhookOutcome::processed())
                }
            }
            WebhookKind::Other => unreachable!("filtered above"),
        }
    }
}
