//! Razorpay-style live gateway adapter.
//!
//! Creates orders over the gateway's REST API with basic auth. Missing or
//! placeholder-looking credentials surface as `NotConfigured` instead of
//! silently degrading to mock behavior.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::PaymentConfig;
use crate::ports::{CreateOrderRequest, GatewayError, GatewayOrder, PaymentGateway};

const DEFAULT_BASE_URL: &str = "https://api.razorpay.com/v1";

/// Live gateway client.
pub struct RazorpayGateway {
    client: reqwest::Client,
    config: PaymentConfig,
    base_url: String,
}

impl RazorpayGateway {
    pub fn new(config: PaymentConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Overrides the API base URL (tests point this at a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct OrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    notes: OrderNotes,
}

#[derive(Debug, Serialize)]
struct OrderNotes {
    #[serde(rename = "userId")]
    user_id: String,
    #[serde(rename = "planId")]
    plan_id: String,
    #[serde(rename = "creditsToAdd")]
    credits_to_add: String,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    amount: i64,
    currency: String,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    error: Option<GatewayErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorDetail {
    description: Option<String>,
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<GatewayOrder, GatewayError> {
        if !self.config.is_configured() {
            return Err(GatewayError::NotConfigured);
        }

        let body = OrderBody {
            amount: request.amount,
            currency: &request.currency,
            receipt: &request.receipt,
            notes: OrderNotes {
                user_id: request.user_id.to_string(),
                plan_id: request.plan_id.clone(),
                credits_to_add: request.credits_to_add.to_string(),
            },
        };

        let response = self
            .client
            .post(format!("{}/orders", self.base_url))
            .basic_auth(
                &self.config.key_id,
                Some(self.config.key_secret.expose_secret()),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let description = response
                .json::<GatewayErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.description)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(GatewayError::Rejected(description));
        }

        let order: OrderResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        Ok(GatewayOrder {
            id: order.id,
            amount: order.amount,
            currency: order.currency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use secrecy::SecretString;

    fn request() -> CreateOrderRequest {
        CreateOrderRequest {
            amount: 49_900,
            currency: "INR".to_string(),
            receipt: "sub-x-1".to_string(),
            user_id: UserId::new(),
            plan_id: "starter-monthly".to_string(),
            credits_to_add: 25,
        }
    }

    #[tokio::test]
    async fn missing_credentials_are_not_configured() {
        let gateway = RazorpayGateway::new(PaymentConfig::default());
        let err = gateway.create_order(request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured));
    }

    #[tokio::test]
    async fn placeholder_credentials_are_not_configured() {
        let config = PaymentConfig {
            key_id: "your_key_id".to_string(),
            key_secret: SecretString::new("real-looking-secret".to_string()),
            ..Default::default()
        };
        let gateway = RazorpayGateway::new(config);
        let err = gateway.create_order(request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured));
    }
}
