//! UpdateUserHandler - admin role/skill management.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Principal, Role};
use crate::ports::UserRepository;

/// Command to update a user's role and skills, keyed by email.
#[derive(Debug, Clone)]
pub struct UpdateUserCommand {
    pub email: String,
    pub role: Option<Role>,
    pub skills: Vec<String>,
}

/// Handler for the admin update-user endpoint.
pub struct UpdateUserHandler {
    users: Arc<dyn UserRepository>,
}

impl UpdateUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(
        &self,
        principal: &Principal,
        cmd: UpdateUserCommand,
    ) -> Result<(), DomainError> {
        if !principal.is_admin() {
            return Err(DomainError::forbidden("Admin access required"));
        }

        let user = self
            .users
            .find_by_email(&cmd.email)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "User not found."))?;

        // Absent fields keep current values.
        let next_role = cmd.role.unwrap_or(user.role);
        let next_skills = if cmd.skills.is_empty() {
            user.skills.clone()
        } else {
            cmd.skills
        };

        self.users
            .update_role_and_skills(&cmd.email, next_role, &next_skills)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::foundation::UserId;
    use crate::domain::user::User;

    fn admin() -> Principal {
        Principal::new(UserId::new(), Role::Admin)
    }

    fn fixture() -> (UpdateUserHandler, Arc<InMemoryUserRepository>) {
        let users = Arc::new(InMemoryUserRepository::new());
        let mut user = User::signup("mod@example.com", "hash", vec!["react".to_string()]);
        user.role = Role::User;
        users.seed(user);
        (UpdateUserHandler::new(users.clone()), users)
    }

    #[tokio::test]
    async fn promotes_role_and_replaces_skills() {
        let (handler, users) = fixture();

        handler
            .handle(
                &admin(),
                UpdateUserCommand {
                    email: "mod@example.com".to_string(),
                    role: Some(Role::Moderator),
                    skills: vec!["rust".to_string()],
                },
            )
            .await
            .unwrap();

        let user = users.find_by_email("mod@example.com").await.unwrap().unwrap();
        assert_eq!(user.role, Role::Moderator);
        assert_eq!(user.skills, vec!["rust"]);
    }

    #[tokio::test]
    async fn empty_fields_keep_current_values() {
        let (handler, users) = fixture();

        handler
            .handle(
                &admin(),
                UpdateUserCommand {
                    email: "mod@example.com".to_string(),
                    role: None,
                    skills: vec![],
                },
            )
            .await
            .unwrap();

        let user = users.find_by_email("mod@example.com").await.unwrap().unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.skills, vec!["react"]);
    }

    #[tokio::test]
    async fn non_admin_is_forbidden() {
        let (handler, _) = fixture();
        let principal = Principal::new(UserId::new(), Role::Moderator);

        let err = handler
            .handle(
                &principal,
                UpdateUserCommand {
                    email: "mod@example.com".to_string(),
                    role: None,
                    skills: vec![],
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn unknown_email_is_not_found() {
        let (handler, _) = fixture();
        let err = handler
            .handle(
                &admin(),
                UpdateUserCommand {
                    email: "ghost@example.com".to_string(),
                    role: None,
                    skills: vec![],
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }
}
