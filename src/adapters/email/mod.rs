//! Outbound mail adapters.

mod resend;

pub use resend::ResendMailer;
