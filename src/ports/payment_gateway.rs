//! Payment gateway port for order creation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::UserId;

/// Errors from the payment gateway.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Credentials missing or placeholder-looking. Never silently
    /// downgraded to mock behavior.
    #[error("Payment gateway credentials are missing or invalid")]
    NotConfigured,

    #[error("Gateway request failed: {0}")]
    Request(String),

    #[error("Gateway rejected the order: {0}")]
    Rejected(String),
}

/// Request to create an order at the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Amount in the smallest currency unit.
    pub amount: i64,
    pub currency: String,
    /// Receipt string recorded on the gateway side.
    pub receipt: String,
    /// Correlating metadata.
    pub user_id: UserId,
    pub plan_id: String,
    pub credits_to_add: i32,
}

/// Order created at the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

/// Port for the external payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates an order the checkout widget can pay against.
    async fn create_order(&self, request: CreateOrderRequest) -> Result<GatewayOrder, GatewayError>;
}
