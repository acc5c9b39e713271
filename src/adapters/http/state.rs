//! Shared application state for the HTTP layer.

use std::sync::Arc;

use crate::application::handlers::analysis::ProcessTicketHandler;
use crate::application::handlers::auth::{
    ForgotPasswordHandler, ListUsersHandler, LoginHandler, PasswordResetFlow,
    ResetPasswordHandler, SignupHandler, UpdateUserHandler,
};
use crate::application::handlers::payments::{
    CreateOrderHandler, GetCreditsHandler, HandleWebhookHandler, PaymentHistoryHandler,
    VerifyPaymentHandler,
};
use crate::application::handlers::tickets::{
    AssignedTicketsHandler, CreateTicketHandler, DeleteTicketHandler, GetTicketHandler,
    ListTicketsHandler, UpdateTicketStatusHandler,
};
use crate::config::PaymentConfig;
use crate::ports::{
    JobQueue, Mailer, PasswordHasher, PaymentGateway, PaymentRepository, TicketAnalyzer,
    TicketRepository, TokenService, UserRepository,
};

/// Shared application state containing all port implementations.
///
/// Cloned per request; dependencies are Arc-wrapped for cheap sharing.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub tickets: Arc<dyn TicketRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub analyzer: Arc<dyn TicketAnalyzer>,
    pub mailer: Arc<dyn Mailer>,
    pub queue: Arc<dyn JobQueue>,
    pub tokens: Arc<dyn TokenService>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub payment_config: PaymentConfig,
    pub frontend_url: String,
    pub reset_token_ttl_secs: u64,
}

impl AppState {
    // === Auth handlers ===

    pub fn signup_handler(&self) -> SignupHandler {
        SignupHandler::new(self.users.clone(), self.hasher.clone(), self.tokens.clone())
    }

    pub fn login_handler(&self) -> LoginHandler {
        LoginHandler::new(self.users.clone(), self.hasher.clone(), self.tokens.clone())
    }

    pub fn password_reset_flow(&self) -> Arc<PasswordResetFlow> {
        Arc::new(PasswordResetFlow::new(
            self.users.clone(),
            self.mailer.clone(),
            self.frontend_url.clone(),
            self.reset_token_ttl_secs,
        ))
    }

    pub fn forgot_password_handler(&self) -> ForgotPasswordHandler {
        ForgotPasswordHandler::new(self.queue.clone(), self.password_reset_flow())
    }

    pub fn reset_password_handler(&self) -> ResetPasswordHandler {
        ResetPasswordHandler::new(self.users.clone(), self.hasher.clone())
    }

    pub fn update_user_handler(&self) -> UpdateUserHandler {
        UpdateUserHandler::new(self.users.clone())
    }

    pub fn list_users_handler(&self) -> ListUsersHandler {
        ListUsersHandler::new(self.users.clone())
    }

    // === Ticket handlers ===

    pub fn process_ticket_handler(&self) -> Arc<ProcessTicketHandler> {
        Arc::new(ProcessTicketHandler::new(
            self.tickets.clone(),
            self.users.clone(),
            self.analyzer.clone(),
            self.mailer.clone(),
        ))
    }

    pub fn create_ticket_handler(&self) -> CreateTicketHandler {
        CreateTicketHandler::new(
            self.users.clone(),
            self.tickets.clone(),
            self.queue.clone(),
            self.process_ticket_handler(),
        )
    }

    pub fn list_tickets_handler(&self) -> ListTicketsHandler {
        ListTicketsHandler::new(self.tickets.clone())
    }

    pub fn get_ticket_handler(&self) -> GetTicketHandler {
        GetTicketHandler::new(self.tickets.clone())
    }

    pub fn update_status_handler(&self) -> UpdateTicketStatusHandler {
        UpdateTicketStatusHandler::new(self.tickets.clone(), self.users.clone())
    }

    pub fn delete_ticket_handler(&self) -> DeleteTicketHandler {
        DeleteTicketHandler::new(self.tickets.clone(), self.users.clone())
    }

    pub fn assigned_tickets_handler(&self) -> AssignedTicketsHandler {
        AssignedTicketsHandler::new(self.tickets.clone(), self.users.clone())
    }

    // === Payment handlers ===

    pub fn create_order_handler(&self) -> CreateOrderHandler {
        CreateOrderHandler::new(
            self.users.clone(),
            self.payments.clone(),
            self.gateway.clone(),
            self.payment_config.clone(),
        )
    }

    pub fn verify_payment_handler(&self) -> VerifyPaymentHandler {
        VerifyPaymentHandler::new(
            self.users.clone(),
            self.payments.clone(),
            self.payment_config.clone(),
        )
    }

    pub fn webhook_handler(&self) -> HandleWebhookHandler {
        HandleWebhookHandler::new(
            self.users.clone(),
            self.payments.clone(),
            self.payment_config.clone(),
        )
    }

    pub fn get_credits_handler(&self) -> GetCreditsHandler {
        GetCreditsHandler::new(self.users.clone())
    }

    pub fn payment_history_handler(&self) -> PaymentHistoryHandler {
        PaymentHistoryHandler::new(self.payments.clone())
    }
}
