//! Mock payment gateway.
//!
//! Synthesizes order ids with a fixed prefix so the rest of the payment
//! flow can run without gateway credentials. Wired only when mock mode is
//! explicitly configured; placeholder live credentials never select this
//! adapter.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::foundation::Timestamp;
use crate::domain::payment::MOCK_ORDER_PREFIX;
use crate::ports::{CreateOrderRequest, GatewayError, GatewayOrder, PaymentGateway};

/// Gateway stand-in for environments without real credentials.
#[derive(Default)]
pub struct MockGateway {
    // Disambiguates orders created within the same millisecond.
    counter: AtomicU64,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let serial = self.counter.fetch_add(1, Ordering::Relaxed);
        let id = format!(
            "{MOCK_ORDER_PREFIX}{}{serial}",
            Timestamp::now().as_unix_millis()
        );
        Ok(GatewayOrder {
            id,
            amount: request.amount,
            currency: request.currency,
        })
    }
}
