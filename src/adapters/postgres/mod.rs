//! PostgreSQL adapter implementations of the repository ports.

mod payment_repository;
mod ticket_repository;
mod user_repository;

pub use payment_repository::PostgresPaymentRepository;
pub use ticket_repository::PostgresTicketRepository;
pub use user_repository::PostgresUserRepository;
