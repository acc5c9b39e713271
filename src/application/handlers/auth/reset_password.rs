//! ResetPasswordHandler - consumes a reset token.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::user::hash_reset_token;
use crate::ports::{PasswordHasher, UserRepository};

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 6;

/// Command to reset a password with a raw token from the reset link.
#[derive(Debug, Clone)]
pub struct ResetPasswordCommand {
    pub token: String,
    pub password: String,
}

/// Handler for the reset-password endpoint.
pub struct ResetPasswordHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl ResetPasswordHandler {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    pub async fn handle(&self, cmd: ResetPasswordCommand) -> Result<(), DomainError> {
        if cmd.token.is_empty() || cmd.password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(
                "Token and a password of at least 6 characters are required.",
            ));
        }

        let token_hash = hash_reset_token(&cmd.token);
        let user = self
            .users
            .find_by_reset_token(&token_hash, Timestamp::now())
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::InvalidResetToken, "Invalid or expired reset token.")
            })?;

        let password_hash = self
            .hasher
            .hash(&cmd.password)
            .map_err(|e| DomainError::internal(e.to_string()))?;
        self.users.update_password(&user.id, &password_hash).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::user::{generate_reset_token, User};
    use crate::ports::HashError;

    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash(&self, password: &str) -> Result<String, HashError> {
            Ok(format!("hashed:{password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError> {
            Ok(hash == format!("hashed:{password}"))
        }
    }

    async fn seeded_with_token(expiry_secs_from_now: i64) -> (ResetPasswordHandler, Arc<InMemoryUserRepository>, String) {
        let users = Arc::new(InMemoryUserRepository::new());
        let user = User::signup("maria@example.com", "old-hash", vec![]);
        let id = user.id;
        users.seed(user);

        let token = generate_reset_token();
        let expires = if expiry_secs_from_now >= 0 {
            Timestamp::now().plus_secs(expiry_secs_from_now as u64)
        } else {
            Timestamp::now().minus_secs((-expiry_secs_from_now) as u64)
        };
        users.set_reset_token(&id, &token.hash, expires).await.unwrap();

        let handler = ResetPasswordHandler::new(users.clone(), Arc::new(PlainHasher));
        (handler, users, token.raw)
    }

    #[tokio::test]
    async fn valid_token_replaces_password_and_clears_token() {
        let (handler, users, raw) = seeded_with_token(900).await;

        handler
            .handle(ResetPasswordCommand {
                token: raw.clone(),
                password: "new-password".to_string(),
            })
            .await
            .unwrap();

        let user = users.find_by_email("maria@example.com").await.unwrap().unwrap();
        assert_eq!(user.password_hash, "hashed:new-password");
        assert!(user.reset_token_hash.is_none());

        // The token is single-use.
        let err = handler
            .handle(ResetPasswordCommand {
                token: raw,
                password: "another-password".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidResetToken);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let (handler, _, raw) = seeded_with_token(-60).await;
        let err = handler
            .handle(ResetPasswordCommand {
                token: raw,
                password: "new-password".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidResetToken);
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let (handler, _, raw) = seeded_with_token(900).await;
        let err = handler
            .handle(ResetPasswordCommand {
                token: raw,
                password: "short".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn wrong_token_is_rejected() {
        let (handler, _, _) = seeded_with_token(900).await;
        let err = handler
            .handle(ResetPasswordCommand {
                token: "deadbeef".to_string(),
                password: "new-password".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidResetToken);
    }
}
