//! HTTP handlers for the payment endpoints.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use super::dto::{
    mode_label, ConfigResponse, CreateOrderResponse, CreditsResponse, CreditsUserView,
    HistoryResponse, OrderPayerView, OrderPlanView, PaymentView, SnapshotView,
    VerifiedPaymentView, VerifyRequest, VerifyResponse, WebhookAck,
};
use crate::adapters::http::error::{ApiError, ErrorResponse};
use crate::adapters::http::middleware::RequirePrincipal;
use crate::adapters::http::state::AppState;
use crate::application::handlers::payments::{VerifyPaymentCommand, WebhookOutcome};

/// Header carrying the webhook signature.
const WEBHOOK_SIGNATURE_HEADER: &str = "x-razorpay-signature";

/// GET /api/payments/config
pub async fn payment_config(
    State(state): State<AppState>,
    RequirePrincipal(_principal): RequirePrincipal,
) -> impl IntoResponse {
    let config = &state.payment_config;
    Json(ConfigResponse {
        mode: mode_label(config.mode).to_string(),
        key_id: config.key_id.clone(),
        amount: config.subscription_amount,
        credits_to_add: config.subscription_credits,
        plan_id: config.plan_id.clone(),
        configured: config.is_configured(),
    })
}

/// GET /api/payments/credits
pub async fn my_credits(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
) -> Result<impl IntoResponse, ApiError> {
    let view = state.get_credits_handler().handle(&principal).await?;
    Ok(Json(CreditsResponse {
        user: CreditsUserView {
            email: view.email,
            credits_remaining: view.snapshot.credits_remaining,
            credits_used: view.snapshot.credits_used,
            subscription_status: view.snapshot.subscription_status.as_str().to_string(),
        },
    }))
}

/// GET /api/payments/history
pub async fn payment_history(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
) -> Result<impl IntoResponse, ApiError> {
    let payments = state.payment_history_handler().handle(&principal).await?;
    Ok(Json(HistoryResponse {
        payments: payments.iter().map(PaymentView::from).collect(),
    }))
}

/// POST /api/payments/create-order
pub async fn create_order(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.create_order_handler().handle(&principal).await?;

    let response = CreateOrderResponse {
        mode: mode_label(result.mode).to_string(),
        order_id: result.order_id,
        amount: result.amount,
        currency: result.currency,
        key_id: result.key_id,
        user: OrderPayerView {
            name: result.payer_name,
            email: result.payer_email,
        },
        plan: OrderPlanView {
            id: result.plan_id,
            credits_to_add: result.credits_to_add,
        },
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/payments/verify
pub async fn verify_payment(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Json(request): Json<VerifyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .verify_payment_handler()
        .handle(
            &principal,
            VerifyPaymentCommand {
                order_id: request.order_id,
                payment_id: request.payment_id,
                signature: request.signature,
            },
        )
        .await?;

    let message = if result.duplicate {
        "Payment already verified."
    } else {
        "Subscription activated successfully."
    };

    let response = VerifyResponse {
        message: message.to_string(),
        duplicate: result.duplicate,
        user: result.user.as_ref().map(SnapshotView::from),
        payment: VerifiedPaymentView {
            order_id: result.order_id,
            payment_id: result.payment_id,
            status: "verified".to_string(),
        },
    };
    Ok(Json(response))
}

/// POST /api/payments/webhook
///
/// Receives the raw body bytes; the signature covers them exactly, so
/// this route must never run through a JSON extractor.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let outcome = state.webhook_handler().handle(&body, signature).await?;

    let response = match outcome {
        WebhookOutcome::Rejected { message } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("WEBHOOK_REJECTED", message)),
        )
            .into_response(),
        WebhookOutcome::Acknowledged { ignored, duplicate } => (
            StatusCode::OK,
            Json(WebhookAck {
                received: true,
                ignored,
                duplicate,
            }),
        )
            .into_response(),
    };
    Ok(response)
}
