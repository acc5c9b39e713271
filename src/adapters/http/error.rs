//! Domain-error to HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Error body returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// API error wrapper converting [`DomainError`] into a response.
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.code {
            ErrorCode::ValidationFailed
            | ErrorCode::InvalidStatus
            | ErrorCode::WeakPassword
            | ErrorCode::InvalidResetToken
            | ErrorCode::InvalidSignature => StatusCode::BAD_REQUEST,
            ErrorCode::InvalidCredentials | ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::UserNotFound | ErrorCode::TicketNotFound | ErrorCode::PaymentNotFound => {
                StatusCode::NOT_FOUND
            }
            ErrorCode::CreditExhausted => StatusCode::PAYMENT_REQUIRED,
            ErrorCode::DuplicateEmail => StatusCode::BAD_REQUEST,
            ErrorCode::GatewayNotConfigured
            | ErrorCode::GatewayError
            | ErrorCode::DatabaseError
            | ErrorCode::MailError
            | ErrorCode::QueueError
            | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Internal detail stays in the logs; clients get a generic line.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR
            && !matches!(self.0.code, ErrorCode::GatewayNotConfigured | ErrorCode::GatewayError)
        {
            tracing::error!(code = %self.0.code, message = %self.0.message, "internal error");
            "Internal server error.".to_string()
        } else {
            self.0.message.clone()
        };

        let body = ErrorResponse::new(self.0.code.to_string(), message);
        (status, Json(body)).into_response()
    }
}
