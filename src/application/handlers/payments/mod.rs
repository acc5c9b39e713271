//! Payment command/query handlers.

mod create_order;
mod credits;
mod handle_webhook;
mod verification;
mod verify_payment;

pub use create_order::{CreateOrderHandler, CreateOrderResult};
pub use credits::{CreditsView, GetCreditsHandler, PaymentHistoryHandler};
pub use handle_webhook::{HandleWebhookHandler, WebhookOutcome};
pub use verify_payment::{VerifyPaymentCommand, VerifyPaymentHandler, VerifyPaymentResult};
