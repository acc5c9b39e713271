//! HTTP adapter: routers, DTOs, middleware, and error mapping.

pub mod auth;
pub mod error;
pub mod middleware;
pub mod payments;
pub mod state;
pub mod tickets;

pub use state::AppState;

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::{Json, Router};

use self::middleware::auth_middleware;

/// GET /api/health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

/// Assembles the full API router.
///
/// The auth middleware runs on every route; open routes simply never
/// require the injected principal.
pub fn api_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .nest("/auth", auth::auth_routes())
        .nest("/tickets", tickets::ticket_routes())
        .nest("/payments", payments::payment_routes())
        .layer(from_fn_with_state(state.tokens.clone(), auth_middleware))
        .with_state(state);

    Router::new().nest("/api", api)
}
