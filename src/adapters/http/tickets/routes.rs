//! Axum router for the ticket endpoints.

use axum::routing::{get, patch};
use axum::Router;

use super::handlers::{
    assigned_tickets, create_ticket, delete_ticket, get_ticket, list_tickets, update_status,
};
use crate::adapters::http::state::AppState;

/// Routes mounted under `/api/tickets`; all require authentication.
///
/// `/assigned` is registered before `/:id` so the literal segment wins.
pub fn ticket_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tickets).post(create_ticket))
        .route("/assigned", get(assigned_tickets))
        .route("/:id", get(get_ticket).delete(delete_ticket))
        .route("/:id/status", patch(update_status))
}
