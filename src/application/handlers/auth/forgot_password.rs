//! ForgotPasswordHandler and the password-reset operation it dispatches.
//!
//! The reset work (find the account, mint a token, mail the link) is
//! written once in [`PasswordResetFlow`] and invoked from two paths: the
//! background runner, or inline when the runner cannot accept the job.
//! The HTTP response is identical whether or not the account exists.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::user::generate_reset_token;
use crate::ports::{BackgroundJob, JobError, JobQueue, Mailer, UserRepository};

/// The one generic response; it must not leak account existence.
pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If your account exists, a password reset link has been sent to your email.";

/// The reset operation itself, runnable from the job runner or inline.
pub struct PasswordResetFlow {
    users: Arc<dyn UserRepository>,
    mailer: Arc<dyn Mailer>,
    frontend_url: String,
    token_ttl_secs: u64,
}

impl PasswordResetFlow {
    pub fn new(
        users: Arc<dyn UserRepository>,
        mailer: Arc<dyn Mailer>,
        frontend_url: impl Into<String>,
        token_ttl_secs: u64,
    ) -> Self {
        Self {
            users,
            mailer,
            frontend_url: frontend_url.into(),
            token_ttl_secs,
        }
    }

    pub async fn run(&self, email: &str) -> Result<(), JobError> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(|e| JobError::retriable(e.to_string()))?
            .ok_or_else(|| JobError::non_retriable("User does not exist"))?;

        let token = generate_reset_token();
        let expires = crate::domain::foundation::Timestamp::now().plus_secs(self.token_ttl_secs);
        self.users
            .set_reset_token(&user.id, &token.hash, expires)
            .await
            .map_err(|e| JobError::retriable(e.to_string()))?;

        let reset_link = format!(
            "{}/reset-password/{}",
            self.frontend_url.trim_end_matches('/'),
            token.raw
        );
        let body = format!(
            "Hi {},\n\nYou requested a password reset.\n\nReset link:\n{}\n\nThis link expires in {} minutes.\nIf you did not request this, ignore this email.",
            user.email,
            reset_link,
            self.token_ttl_secs / 60
        );

        self.mailer
            .send(&user.email, "Reset your password", &body)
            .await
            .map_err(|e| JobError::retriable(e.to_string()))?;

        Ok(())
    }
}

/// Command for a password-reset request.
#[derive(Debug, Clone)]
pub struct ForgotPasswordCommand {
    pub email: String,
}

/// Handler for the forgot-password endpoint.
pub struct ForgotPasswordHandler {
    queue: Arc<dyn JobQueue>,
    flow: Arc<PasswordResetFlow>,
}

impl ForgotPasswordHandler {
    pub fn new(queue: Arc<dyn JobQueue>, flow: Arc<PasswordResetFlow>) -> Self {
        Self { queue, flow }
    }

    pub async fn handle(&self, cmd: ForgotPasswordCommand) -> Result<(), DomainError> {
        let email = cmd.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(DomainError::validation("Email is required."));
        }

        let job = BackgroundJob::PasswordResetRequested {
            email: email.clone(),
        };
        if let Err(e) = self.queue.enqueue(job) {
            tracing::warn!(error = %e, "reset dispatch failed, running inline");
            // Inline outcome must not alter the response: a missing
            // account and a delivered mail look identical to the caller.
            if let Err(e) = self.flow.run(&email).await {
                tracing::warn!(error = %e, "inline password reset failed");
            }
        }

        Ok(())
    }
}
