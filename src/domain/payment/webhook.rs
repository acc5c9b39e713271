//! Gateway webhook verification and event parsing.
//!
//! Webhooks are signed with HMAC-SHA256 over the exact raw request bytes
//! using a secret separate from the checkout key secret. Delivery is
//! at-least-once: parsing is tolerant and unrecognized events are
//! acknowledged, never errored, or the sender would retry forever.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use super::signature::constant_time_eq;

type HmacSha256 = Hmac<Sha256>;

/// Verifies the webhook signature header against the raw body bytes.
pub fn verify_webhook_signature(webhook_secret: &str, payload: &[u8], provided: &str) -> bool {
    let mut mac =
        HmacSha256::new_from_slice(webhook_secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    let expected = hex::encode(mac.finalize().into_bytes());
    constant_time_eq(expected.as_bytes(), provided.as_bytes())
}

/// Computes a webhook signature, used to sign test fixtures.
pub fn webhook_signature(webhook_secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(webhook_secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Event kinds this system acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookKind {
    PaymentCaptured,
    PaymentFailed,
    /// Anything else is acknowledged and ignored.
    Other,
}

/// A parsed webhook event. Every field the sender might omit is optional.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    pub kind: WebhookKind,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawWebhook {
    #[serde(default)]
    event: Option<String>,
    #[serde(default)]
    payload: Option<RawPayload>,
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(default)]
    payment: Option<RawPaymentWrapper>,
}

#[derive(Debug, Deserialize)]
struct RawPaymentWrapper {
    #[serde(default)]
    entity: Option<RawPaymentEntity>,
}

#[derive(Debug, Deserialize)]
struct RawPaymentEntity {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    order_id: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Parses a webhook body.
///
/// Returns `Err` only for bodies that are not JSON at all; structurally
/// surprising JSON becomes an [`WebhookKind::Other`] event.
pub fn parse_webhook_event(payload: &[u8]) -> Result<WebhookEvent, serde_json::Error> {
    let raw: RawWebhook = serde_json::from_slice(payload)?;

    let kind = match raw.event.as_deref() {
        Some("payment.captured") => WebhookKind::PaymentCaptured,
        Some("payment.failed") => WebhookKind::PaymentFailed,
        _ => WebhookKind::Other,
    };

    let entity = raw.payload.and_then(|p| p.payment).and_then(|p| p.entity);
    let (order_id, payment_id, error_description) = match entity {
        Some(e) => (e.order_id, e.id, e.error_description),
        None => (None, None, None),
    };

    Ok(WebhookEvent {
        kind,
        order_id,
        payment_id,
        error_description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whk_test_secret";

    fn captured_body(order_id: &str, payment_id: &str) -> Vec<u8> {
        serde_json::json!({
            "event": "payment.captured",
            "payload": { "payment": { "entity": {
                "id": payment_id,
                "order_id": order_id,
            }}}
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn accepts_correct_signature() {
        let body = captured_body("order_1", "pay_1");
        let sig = webhook_signature(SECRET, &body);
        assert!(verify_webhook_signature(SECRET, &body, &sig));
    }

    #[test]
    fn rejects_single_tampered_byte() {
        let body = captured_body("order_1", "pay_1");
        let sig = webhook_signature(SECRET, &body);
        let mut tampered = body.clone();
        tampered[0] ^= 0x01;
        assert!(!verify_webhook_signature(SECRET, &tampered, &sig));
    }

    #[test]
    fn rejects_wrong_secret() {
        let body = captured_body("order_1", "pay_1");
        let sig = webhook_signature("other_secret", &body);
        assert!(!verify_webhook_signature(SECRET, &body, &sig));
    }

    #[test]
    fn parses_captured_event() {
        let event = parse_webhook_event(&captured_body("order_1", "pay_1")).unwrap();
        assert_eq!(event.kind, WebhookKind::PaymentCaptured);
        assert_eq!(event.order_id.as_deref(), Some("order_1"));
        assert_eq!(event.payment_id.as_deref(), Some("pay_1"));
    }

    #[test]
    fn parses_failed_event_with_reason() {
        let body = serde_json::json!({
            "event": "payment.failed",
            "payload": { "payment": { "entity": {
                "id": "pay_1",
                "order_id": "order_1",
                "error_description": "card declined",
            }}}
        })
        .to_string();
        let event = parse_webhook_event(body.as_bytes()).unwrap();
        assert_eq!(event.kind, WebhookKind::PaymentFailed);
        assert_eq!(event.error_description.as_deref(), Some("card declined"));
    }

    #[test]
    fn unknown_event_is_other() {
        let body = br#"{"event":"refund.processed","payload":{}}"#;
        let event = parse_webhook_event(body).unwrap();
        assert_eq!(event.kind, WebhookKind::Other);
    }

    #[test]
    fn missing_entity_yields_no_order_id() {
        let body = br#"{"event":"payment.captured"}"#;
        let event = parse_webhook_event(body).unwrap();
        assert_eq!(event.kind, WebhookKind::PaymentCaptured);
        assert!(event.order_id.is_none());
    }

    #[test]
    fn non_json_body_is_an_error() {
        assert!(parse_webhook_event(b"not json").is_err());
    }
}
