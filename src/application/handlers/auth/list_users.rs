//! ListUsersHandler - admin user listing.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Principal};
use crate::domain::user::User;
use crate::ports::UserRepository;

/// Handler for the admin users listing.
pub struct ListUsersHandler {
    users: Arc<dyn UserRepository>,
}

impl ListUsersHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, principal: &Principal) -> Result<Vec<User>, DomainError> {
        if !principal.is_admin() {
            return Err(DomainError::forbidden("Admin access required"));
        }
        self.users.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::foundation::{ErrorCode, Role, UserId};

    #[tokio::test]
    async fn admin_sees_all_users() {
        let users = Arc::new(InMemoryUserRepository::new());
        users.seed(User::signup("a@x.test", "h", vec![]));
        users.seed(User::signup("b@x.test", "h", vec![]));
        let handler = ListUsersHandler::new(users);

        let listed = handler
            .handle(&Principal::new(UserId::new(), Role::Admin))
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn moderator_is_forbidden() {
        let handler = ListUsersHandler::new(Arc::new(InMemoryUserRepository::new()));
        let err = handler
            .handle(&Principal::new(UserId::new(), Role::Moderator))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
