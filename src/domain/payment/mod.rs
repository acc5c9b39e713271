//! Payment records and gateway cryptography.

mod signature;
mod webhook;

pub use signature::{checkout_signature, verify_checkout_signature};
pub use webhook::{
    parse_webhook_event, verify_webhook_signature, webhook_signature, WebhookEvent, WebhookKind,
};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{PaymentId, Timestamp, UserId};

/// Prefix of synthesized mock-mode order ids.
pub const MOCK_ORDER_PREFIX: &str = "mock_order_";

/// Prefix of synthesized mock-mode payment ids.
pub const MOCK_PAYMENT_PREFIX: &str = "mock_pay_";

/// Lifecycle of a payment record.
///
/// Transitions are one-way: `Created -> Verified` or `Created -> Failed`.
/// `Verified` is terminal; nothing may overwrite it. The repository
/// enforces this with conditional updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Created,
    Verified,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Created => "created",
            PaymentStatus::Verified => "verified",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(PaymentStatus::Created),
            "verified" => Some(PaymentStatus::Verified),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, PaymentStatus::Verified)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A payment order and its verification outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub user_id: UserId,
    pub gateway_order_id: String,
    pub gateway_payment_id: Option<String>,
    pub signature: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub credits_added: i32,
    pub plan_id: String,
    pub verified_at: Option<Timestamp>,
    pub failure_reason: Option<String>,
    pub created_at: Timestamp,
}

impl Payment {
    /// Builds a freshly created (unverified) order record.
    pub fn created_order(
        user_id: UserId,
        gateway_order_id: impl Into<String>,
        amount: i64,
        currency: impl Into<String>,
        plan_id: impl Into<String>,
    ) -> Self {
        Self {
            id: PaymentId::new(),
            user_id,
            gateway_order_id: gateway_order_id.into(),
            gateway_payment_id: None,
            signature: None,
            amount,
            currency: currency.into(),
            status: PaymentStatus::Created,
            credits_added: 0,
            plan_id: plan_id.into(),
            verified_at: None,
            failure_reason: None,
            created_at: Timestamp::now(),
        }
    }

    /// Whether this order was synthesized by mock mode.
    pub fn is_mock_order(&self) -> bool {
        self.gateway_order_id.starts_with(MOCK_ORDER_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_order_starts_unverified() {
        let payment = Payment::created_order(UserId::new(), "order_1", 49_900, "INR", "starter");
        assert_eq!(payment.status, PaymentStatus::Created);
        assert!(payment.gateway_payment_id.is_none());
        assert!(payment.verified_at.is_none());
        assert_eq!(payment.credits_added, 0);
    }

    #[test]
    fn status_roundtrips() {
        for status in [
            PaymentStatus::Created,
            PaymentStatus::Verified,
            PaymentStatus::Failed,
        ] {
            assert_eq!(PaymentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PaymentStatus::parse("refunded"), None);
    }

    #[test]
    fn mock_orders_are_recognized_by_prefix() {
        let mock = Payment::created_order(UserId::new(), "mock_order_17", 100, "INR", "p");
        let live = Payment::created_order(UserId::new(), "order_17", 100, "INR", "p");
        assert!(mock.is_mock_order());
        assert!(!live.is_mock_order());
    }
}
