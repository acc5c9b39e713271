//! Bearer-token authentication middleware and extractors.
//!
//! The middleware validates the token once and injects a request-scoped
//! [`Principal`] into the request extensions; handlers require it with
//! the [`RequirePrincipal`] extractor. No ambient authentication state.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ErrorResponse;
use crate::domain::foundation::Principal;
use crate::ports::{TokenError, TokenService};

/// Middleware state: the token verifier.
pub type AuthState = Arc<dyn TokenService>;

/// Validates the `Authorization: Bearer <token>` header.
///
/// On success the principal lands in the request extensions; with no
/// header the request continues unauthenticated (open routes); an
/// invalid or expired token is rejected immediately.
pub async fn auth_middleware(
    State(tokens): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(token) => match tokens.verify(token) {
            Ok(principal) => {
                request.extensions_mut().insert(principal);
                next.run(request).await
            }
            Err(e) => {
                let message = match e {
                    TokenError::Expired => "Token expired",
                    _ => "Invalid token",
                };
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse::new("UNAUTHORIZED", message)),
                )
                    .into_response()
            }
        },
        None => next.run(request).await,
    }
}

/// Extractor that requires an authenticated principal.
#[derive(Debug, Clone)]
pub struct RequirePrincipal(pub Principal);

/// Rejection for unauthenticated requests.
#[derive(Debug)]
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(
                "UNAUTHORIZED",
                "Access denied, no token found.",
            )),
        )
            .into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for RequirePrincipal
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<Principal>()
                .copied()
                .map(RequirePrincipal)
                .ok_or(AuthenticationRequired)
        })
    }
}
