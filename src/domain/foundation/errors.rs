//! Error types for the domain layer.

use std::error::Error;
use std::fmt;

/// Error codes organized by category.
///
/// Every error that crosses a port carries one of these codes; the HTTP
/// layer maps codes to statuses in a single place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    InvalidStatus,
    WeakPassword,

    // Authentication / authorization errors
    InvalidCredentials,
    Unauthorized,
    Forbidden,
    InvalidResetToken,

    // Not found errors
    UserNotFound,
    TicketNotFound,
    PaymentNotFound,

    // Business-rule outcomes
    CreditExhausted,
    DuplicateEmail,

    // Payment errors
    InvalidSignature,
    GatewayNotConfigured,
    GatewayError,

    // Infrastructure errors
    DatabaseError,
    MailError,
    QueueError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidStatus => "INVALID_STATUS",
            ErrorCode::WeakPassword => "WEAK_PASSWORD",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::InvalidResetToken => "INVALID_RESET_TOKEN",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::TicketNotFound => "TICKET_NOT_FOUND",
            ErrorCode::PaymentNotFound => "PAYMENT_NOT_FOUND",
            ErrorCode::CreditExhausted => "CREDIT_EXHAUSTED",
            ErrorCode::DuplicateEmail => "DUPLICATE_EMAIL",
            ErrorCode::InvalidSignature => "INVALID_SIGNATURE",
            ErrorCode::GatewayNotConfigured => "GATEWAY_NOT_CONFIGURED",
            ErrorCode::GatewayError => "GATEWAY_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::MailError => "MAIL_ERROR",
            ErrorCode::QueueError => "QUEUE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Creates a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Creates a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// The exhausted-credit business outcome.
    pub fn credit_exhausted() -> Self {
        Self::new(
            ErrorCode::CreditExhausted,
            "No credits remaining. Please subscribe to continue creating tickets.",
        )
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_code_and_message() {
        let err = DomainError::new(ErrorCode::TicketNotFound, "Ticket not found");
        assert_eq!(format!("{}", err), "[TICKET_NOT_FOUND] Ticket not found");
    }

    #[test]
    fn credit_exhausted_carries_machine_code() {
        let err = DomainError::credit_exhausted();
        assert_eq!(err.code, ErrorCode::CreditExhausted);
        assert_eq!(format!("{}", err.code), "CREDIT_EXHAUSTED");
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::InvalidSignature), "INVALID_SIGNATURE");
        assert_eq!(format!("{}", ErrorCode::InternalError), "INTERNAL_ERROR");
    }
}
