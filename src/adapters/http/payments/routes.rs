//! Axum router for the payment endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    create_order, my_credits, payment_config, payment_history, payment_webhook, verify_payment,
};
use crate::adapters::http::state::AppState;

/// Routes mounted under `/api/payments`.
///
/// The webhook is unauthenticated (signature-verified) and consumes the
/// raw body; everything else requires a bearer token.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/config", get(payment_config))
        .route("/credits", get(my_credits))
        .route("/history", get(payment_history))
        .route("/create-order", post(create_order))
        .route("/verify", post(verify_payment))
        .route("/webhook", post(payment_webhook))
}
