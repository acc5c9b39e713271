//! Ports: trait seams between the application core and the outside world.

mod job_queue;
mod mailer;
mod password_hasher;
mod payment_gateway;
mod payment_repository;
mod ticket_analyzer;
mod ticket_repository;
mod token_service;
mod user_repository;

pub use job_queue::{BackgroundJob, EnqueueError, JobError, JobHandler, JobQueue};
pub use mailer::{MailError, Mailer};
pub use password_hasher::{HashError, PasswordHasher};
pub use payment_gateway::{CreateOrderRequest, GatewayError, GatewayOrder, PaymentGateway};
pub use payment_repository::PaymentRepository;
pub use ticket_analyzer::TicketAnalyzer;
pub use ticket_repository::TicketRepository;
pub use token_service::{TokenError, TokenService};
pub use user_repository::UserRepository;
