//! Request-scoped authentication principal.
//!
//! The principal is extracted from the bearer token once per request and
//! passed explicitly into every handler; no handler reads ambient
//! authentication state.

use serde::{Deserialize, Serialize};

use super::{Role, UserId};

/// The authenticated caller of a request: identity plus role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}
