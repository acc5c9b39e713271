//! LoginHandler - credential verification and token issue.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Principal};
use crate::domain::user::User;
use crate::ports::{PasswordHasher, TokenService, UserRepository};

/// Command to log in.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: User,
    pub token: String,
}

/// Handler for credential verification.
pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl LoginHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub async fn handle(&self, cmd: LoginCommand) -> Result<LoginResult, DomainError> {
        let email = cmd.email.trim().to_lowercase();
        if email.is_empty() || cmd.password.is_empty() {
            return Err(DomainError::validation("Email and password are required."));
        }

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::InvalidCredentials, "User not found"))?;

        let matches = self
            .hasher
            .verify(&cmd.password, &user.password_hash)
            .map_err(|e| DomainError::internal(e.to_string()))?;
        if !matches {
            return Err(DomainError::new(
                ErrorCode::InvalidCredentials,
                "Invalid credentials.",
            ));
        }

        let token = self
            .tokens
            .issue(&Principal::new(user.id, user.role))
            .map_err(|e| DomainError::internal(e.to_string()))?;

        Ok(LoginResult { user, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::ports::{HashError, TokenError};

    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash(&self, password: &str) -> Result<String, HashError> {
            Ok(format!("hashed:{password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError> {
            Ok(hash == format!("hashed:{password}"))
        }
    }

    struct StaticTokens;

    impl TokenService for StaticTokens {
        fn issue(&self, _principal: &Principal) -> Result<String, TokenError> {
            Ok("token".to_string())
        }

        fn verify(&self, _token: &str) -> Result<Principal, TokenError> {
            Err(TokenError::Invalid)
        }
    }

    fn handler_with_user() -> LoginHandler {
        let users = Arc::new(InMemoryUserRepository::new());
        users.seed(User::signup("maria@example.com", "hashed:hunter22", vec![]));
        LoginHandler::new(users, Arc::new(PlainHasher), Arc::new(StaticTokens))
    }

    #[tokio::test]
    async fn valid_credentials_yield_token() {
        let handler = handler_with_user();
        let result = handler
            .handle(LoginCommand {
                email: "Maria@Example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(result.token, "token");
        assert_eq!(result.user.email, "maria@example.com");
    }

    #[tokio::test]
    async fn unknown_email_is_invalid_credentials() {
        let handler = handler_with_user();
        let err = handler
            .handle(LoginCommand {
                email: "nobody@example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let handler = handler_with_user();
        let err = handler
            .handle(LoginCommand {
                email: "maria@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
    }
}
