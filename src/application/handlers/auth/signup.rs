//! SignupHandler - account creation.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Principal};
use crate::domain::user::User;
use crate::ports::{PasswordHasher, TokenService, UserRepository};

/// Command to create an account.
#[derive(Debug, Clone)]
pub struct SignupCommand {
    pub email: String,
    pub password: String,
    pub skills: Vec<String>,
}

/// Result of a successful signup.
#[derive(Debug, Clone)]
pub struct SignupResult {
    pub user: User,
    pub token: String,
}

/// Handler for account creation.
pub struct SignupHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl SignupHandler {
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

    pub async fn handle(&self, cmd: SignupCommand) -> Result<SignupResult, DomainError> {
        let email = cmd.email.trim().to_lowercase();
        if email.is_empty() || cmd.password.is_empty() {
            return Err(DomainError::validation("Email and password are required."));
        }

        let password_hash = self
            .hasher
            .hash(&cmd.password)
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let user = User::signup(email, password_hash, cmd.skills);
        self.users.insert(&user).await?;

        let token = self
            .tokens
            .issue(&Principal::new(user.id, user.role))
            .map_err(|e| DomainError::internal(e.to_string()))?;

        Ok(SignupResult { user, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::foundation::ErrorCode;
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
        fn issue(&self, principal: &Principal) -> Result<String, TokenError> {
            Ok(format!("token-{}", principal.user_id))
        }

        fn verify(&self, _token: &str) -> Result<Principal, TokenError> {
            Err(TokenError::Invalid)
        }
    }

    fn handler() -> (SignupHandler, Arc<InMemoryUserRepository>) {
        let users = Arc::new(InMemoryUserRepository::new());
        let handler = SignupHandler::new(users.clone(), Arc::new(PlainHasher), Arc::new(StaticTokens));
        (handler, users)
    }

    #[tokio::test]
    async fn signup_normalizes_email_and_hashes_password() {
        let (handler, users) = handler();

        let result = handler
            .handle(SignupCommand {
                email: "  Maria@Example.COM ".to_string(),
                password: "hunter22".to_string(),
                skills: vec!["react".to_string()],
            })
            .await
            .unwrap();

        assert_eq!(result.user.email, "maria@example.com");
        assert!(!result.token.is_empty());

        let stored = users.find_by_email("maria@example.com").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "hashed:hunter22");
        assert_eq!(stored.skills, vec!["react"]);
    }

    #[tokio::test]
    async fn empty_fields_are_rejected() {
        let (handler, _) = handler();

        let err = handler
            .handle(SignupCommand {
                email: "".to_string(),
                password: "pw".to_string(),
                skills: vec![],
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = handler
            .handle(SignupCommand {
                email: "a@b.test".to_string(),
                password: "".to_string(),
                skills: vec![],
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn duplicate_email_surfaces() {
        let (handler, _) = handler();
        let cmd = SignupCommand {
            email: "a@b.test".to_string(),
            password: "pw".to_string(),
            skills: vec![],
        };

        handler.handle(cmd.clone()).await.unwrap();
        let err = handler.handle(cmd).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateEmail);
    }
}
