//! Request/response DTOs for the payment endpoints.

use serde::{Deserialize, Serialize};

use crate::config::PaymentMode;
use crate::domain::foundation::Timestamp;
use crate::domain::payment::Payment;
use crate::domain::user::CreditSnapshot;

/// Client-submitted verification proof. The mock flow sends `orderId`,
/// the live checkout widget the gateway-prefixed names.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyRequest {
    #[serde(default, alias = "orderId", alias = "razorpay_order_id")]
    pub order_id: Option<String>,
    #[serde(default, alias = "paymentId", alias = "razorpay_payment_id")]
    pub payment_id: Option<String>,
    #[serde(default, alias = "signature", alias = "razorpay_signature")]
    pub signature: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub mode: String,
    pub key_id: String,
    pub amount: i64,
    pub credits_to_add: i32,
    pub plan_id: String,
    pub configured: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditsUserView {
    pub email: String,
    pub credits_remaining: i32,
    pub credits_used: i32,
    pub subscription_status: String,
}

#[derive(Debug, Serialize)]
pub struct CreditsResponse {
    pub user: CreditsUserView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotView {
    pub credits_remaining: i32,
    pub credits_used: i32,
    pub subscription_status: String,
}

impl From<&CreditSnapshot> for SnapshotView {
    fn from(snapshot: &CreditSnapshot) -> Self {
        Self {
            credits_remaining: snapshot.credits_remaining,
            credits_used: snapshot.credits_used,
            subscription_status: snapshot.subscription_status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayerView {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlanView {
    pub id: String,
    pub credits_to_add: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub mode: String,
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
    pub user: OrderPayerView,
    pub plan: OrderPlanView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedPaymentView {
    pub order_id: String,
    pub payment_id: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub message: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub duplicate: bool,
    pub user: Option<SnapshotView>,
    pub payment: VerifiedPaymentView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    pub order_id: String,
    pub payment_id: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub credits_added: i32,
    pub verified_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<&Payment> for PaymentView {
    fn from(payment: &Payment) -> Self {
        Self {
            order_id: payment.gateway_order_id.clone(),
            payment_id: payment.gateway_payment_id.clone(),
            amount: payment.amount,
            currency: payment.currency.clone(),
            status: payment.status.as_str().to_string(),
            credits_added: payment.credits_added,
            verified_at: payment.verified_at,
            created_at: payment.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub payments: Vec<PaymentView>,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ignored: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub duplicate: bool,
}

pub fn mode_label(mode: PaymentMode) -> &'static str {
    match mode {
        PaymentMode::Live => "razorpay",
        PaymentMode::Mock => "mock",
    }
}
