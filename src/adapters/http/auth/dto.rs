//! Request/response DTOs for the auth endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::user::User;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: String,
    pub role: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Sanitized user as exposed over the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub role: String,
    pub skills: Vec<String>,
    pub issues_resolved: i32,
    pub score: i32,
    pub credits_remaining: i32,
    pub credits_used: i32,
    pub subscription_status: String,
    pub created_at: Timestamp,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            skills: user.skills.clone(),
            issues_resolved: user.issues_resolved,
            score: user.score,
            credits_remaining: user.credits_remaining,
            credits_used: user.credits_used,
            subscription_status: user.subscription_status.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserView,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_view_omits_password_hash() {
        let user = User::signup("a@b.test", "secret-hash", vec![]);
        let view = UserView::from(&user);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("creditsRemaining"));
    }

    #[test]
    fn signup_request_defaults_missing_fields() {
        let request: SignupRequest = serde_json::from_str("{}").unwrap();
        assert!(request.email.is_empty());
        assert!(request.skills.is_empty());
    }
}
