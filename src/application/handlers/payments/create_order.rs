//! CreateOrderHandler - starts a subscription checkout.

use std::sync::Arc;

use crate::config::{PaymentConfig, PaymentMode};
use crate::domain::foundation::{DomainError, ErrorCode, Principal, Timestamp};
use crate::domain::payment::Payment;
use crate::ports::{
    CreateOrderRequest, GatewayError, PaymentGateway, PaymentRepository, UserRepository,
};

/// Result of order creation, shaped for the checkout widget.
#[derive(Debug, Clone)]
pub struct CreateOrderResult {
    pub mode: PaymentMode,
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
    pub payer_name: String,
    pub payer_email: String,
    pub plan_id: String,
    pub credits_to_add: i32,
}

/// Handler for the create-order endpoint.
pub struct CreateOrderHandler {
    users: Arc<dyn UserRepository>,
    payments: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
    config: PaymentConfig,
}

impl CreateOrderHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        payments: Arc<dyn PaymentRepository>,
        gateway: Arc<dyn PaymentGateway>,
        config: PaymentConfig,
    ) -> Self {
        Self {
            users,
            payments,
            gateway,
            config,
        }
    }

    pub async fn handle(&self, principal: &Principal) -> Result<CreateOrderResult, DomainError> {
        let user = self
            .users
            .find_by_id(&principal.user_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "User not found"))?;

        let amount = self.config.subscription_amount_minor();
        let receipt = format!("sub-{}-{}", user.id, Timestamp::now().as_unix_millis());

        let order = self
            .gateway
            .create_order(CreateOrderRequest {
                amount,
                currency: self.config.currency.clone(),
                receipt,
                user_id: user.id,
                plan_id: self.config.plan_id.clone(),
                credits_to_add: self.config.subscription_credits,
            })
            .await
            .map_err(|e| match e {
                GatewayError::NotConfigured => DomainError::new(
                    ErrorCode::GatewayNotConfigured,
                    "Payment gateway credentials are missing or invalid. Set a valid key pair in the environment.",
                ),
                other => DomainError::new(ErrorCode::GatewayError, other.to_string()),
            })?;

        let payment = Payment::created_order(
            user.id,
            order.id.clone(),
            order.amount,
            order.currency.clone(),
            self.config.plan_id.clone(),
        );
        self.payments.insert(&payment).await?;

        let key_id = if self.config.is_mock() {
            "mock_key".to_string()
        } else {
            self.config.key_id.clone()
        };

        Ok(CreateOrderResult {
            mode: self.config.mode,
            order_id: order.id,
            amount: order.amount,
            currency: order.currency,
            key_id,
            payer_name: user.display_name().to_string(),
            payer_email: user.email.clone(),
            plan_id: self.config.plan_id.clone(),
            credits_to_add: self.config.subscription_credits,
        })
    }
}
