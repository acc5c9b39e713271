//! Axum router for the auth endpoints.

use axum::{routing::get, routing::post, Router};

use super::handlers::{
    forgot_password, list_users, login, logout, reset_password, signup, update_user,
};
use crate::adapters::http::state::AppState;

/// Routes mounted under `/api/auth`.
///
/// - `POST /signup`, `POST /login`, `POST /forgot-password`,
///   `POST /reset-password/{token}` - open
/// - `POST /logout` - authenticated
/// - `POST /update-user`, `GET /users` - admin
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/:token", post(reset_password))
        .route("/update-user", post(update_user))
        .route("/users", get(list_users))
}
