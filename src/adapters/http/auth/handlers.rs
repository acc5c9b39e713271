//! HTTP handlers for the auth endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::dto::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, ResetPasswordRequest,
    SignupRequest, UpdateUserRequest, UserView,
};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequirePrincipal;
use crate::adapters::http::state::AppState;
use crate::application::handlers::auth::{
    ForgotPasswordCommand, LoginCommand, ResetPasswordCommand, SignupCommand, UpdateUserCommand,
    FORGOT_PASSWORD_MESSAGE,
};
use crate::domain::foundation::{DomainError, Role};

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .signup_handler()
        .handle(SignupCommand {
            email: request.email,
            password: request.password,
            skills: request.skills,
        })
        .await?;

    let response = AuthResponse {
        user: UserView::from(&result.user),
        token: result.token,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .login_handler()
        .handle(LoginCommand {
            email: request.email,
            password: request.password,
        })
        .await?;

    let response = AuthResponse {
        user: UserView::from(&result.user),
        token: result.token,
    };
    Ok(Json(response))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; a verified caller just gets an acknowledgement.
pub async fn logout(RequirePrincipal(_principal): RequirePrincipal) -> impl IntoResponse {
    Json(MessageResponse::new("Logout successful."))
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .forgot_password_handler()
        .handle(ForgotPasswordCommand {
            email: request.email,
        })
        .await?;

    Ok(Json(MessageResponse::new(FORGOT_PASSWORD_MESSAGE)))
}

/// POST /api/auth/reset-password/{token}
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .reset_password_handler()
        .handle(ResetPasswordCommand {
            token,
            password: request.password,
        })
        .await?;

    Ok(Json(MessageResponse::new("Password reset successful.")))
}

/// POST /api/auth/update-user (admin)
pub async fn update_user(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Json(request): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let role = request
        .role
        .as_deref()
        .map(|r| {
            Role::parse(r)
                .ok_or_else(|| DomainError::validation(format!("Unknown role: {r}")))
        })
        .transpose()?;

    state
        .update_user_handler()
        .handle(
            &principal,
            UpdateUserCommand {
                email: request.email,
                role,
                skills: request.skills,
            },
        )
        .await?;

    Ok(Json(MessageResponse::new("User updated successfully.")))
}

/// GET /api/auth/users (admin)
pub async fn list_users(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.list_users_handler().handle(&principal).await?;
    let views: Vec<UserView> = users.iter().map(UserView::from).collect();
    Ok(Json(views))
}
