//! In-memory adapter implementations.
//!
//! Used by tests and local development without a database. The guarded
//! updates hold one lock across check-and-write, so they honor the same
//! exactly-once semantics as the PostgreSQL adapters.

mod job_queue;
mod payment_repository;
mod ticket_repository;
mod user_repository;

pub use job_queue::InMemoryJobQueue;
pub use payment_repository::InMemoryPaymentRepository;
pub use ticket_repository::InMemoryTicketRepository;
pub use user_repository::InMemoryUserRepository;
