//! Foundation value objects shared across the domain.

mod auth;
mod errors;
mod ids;
mod role;
mod timestamp;

pub use auth::Principal;
pub use errors::{DomainError, ErrorCode};
pub use ids::{PaymentId, TicketId, UserId};
pub use role::Role;
pub use timestamp::Timestamp;
