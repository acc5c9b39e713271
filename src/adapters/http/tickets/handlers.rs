//! HTTP handlers for the ticket endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::dto::{
    AssignedTicketsResponse, CreateTicketRequest, CreateTicketResponse, CreditsInfo,
    DeleteTicketResponse, ModeratorStatsView, SolvedHistoryView, TicketResponse,
    TicketSummaryView, TicketView, UpdateStatusRequest, UpdateStatusResponse,
};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequirePrincipal;
use crate::adapters::http::state::AppState;
use crate::application::handlers::tickets::{CreateTicketCommand, UpdateTicketStatusCommand};
use crate::domain::foundation::{DomainError, ErrorCode, TicketId};

fn parse_ticket_id(raw: &str) -> Result<TicketId, ApiError> {
    raw.parse::<TicketId>()
        .map_err(|_| ApiError(DomainError::new(ErrorCode::TicketNotFound, "Ticket not found")))
}

/// POST /api/tickets
pub async fn create_ticket(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Json(request): Json<CreateTicketRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .create_ticket_handler()
        .handle(
            &principal,
            CreateTicketCommand {
                title: request.title,
                description: request.description,
            },
        )
        .await?;

    let message = if result.queued {
        "Ticket created successfully. AI agent is processing it."
    } else {
        "Ticket created and processed by local AI fallback."
    };

    let response = CreateTicketResponse {
        message: message.to_string(),
        ticket: TicketView::from(&result.ticket),
        credits: result.credits.as_ref().map(CreditsInfo::from),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/tickets
pub async fn list_tickets(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
) -> Result<impl IntoResponse, ApiError> {
    let tickets = state.list_tickets_handler().handle(&principal).await?;

    if principal.is_staff() {
        let views: Vec<TicketView> = tickets.iter().map(TicketView::from).collect();
        Ok(Json(views).into_response())
    } else {
        let views: Vec<TicketSummaryView> = tickets.iter().map(TicketSummaryView::from).collect();
        Ok(Json(views).into_response())
    }
}

/// GET /api/tickets/assigned
pub async fn assigned_tickets(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.assigned_tickets_handler().handle(&principal).await?;

    let response = AssignedTicketsResponse {
        tickets: result.tickets.iter().map(TicketView::from).collect(),
        solved_history: result
            .solved_history
            .iter()
            .map(SolvedHistoryView::from)
            .collect(),
        moderator_stats: result.moderator_stats.as_ref().map(ModeratorStatsView::from),
    };
    Ok(Json(response))
}

/// GET /api/tickets/{id}
pub async fn get_ticket(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket_id = parse_ticket_id(&id)?;
    let ticket = state
        .get_ticket_handler()
        .handle(&principal, ticket_id)
        .await?;

    if principal.is_staff() {
        Ok(Json(TicketResponse {
            ticket: TicketView::from(&ticket),
        })
        .into_response())
    } else {
        Ok(Json(serde_json::json!({
            "ticket": TicketSummaryView::from(&ticket)
        }))
        .into_response())
    }
}

/// PATCH /api/tickets/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket_id = parse_ticket_id(&id)?;
    let result = state
        .update_status_handler()
        .handle(
            &principal,
            UpdateTicketStatusCommand {
                ticket_id,
                status: request.status,
            },
        )
        .await?;

    let response = UpdateStatusResponse {
        message: "Ticket status updated successfully.".to_string(),
        ticket: TicketView::from(&result.ticket),
        moderator_stats: result.moderator_stats.as_ref().map(ModeratorStatsView::from),
    };
    Ok(Json(response))
}

/// DELETE /api/tickets/{id}
pub async fn delete_ticket(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket_id = parse_ticket_id(&id)?;
    let result = state
        .delete_ticket_handler()
        .handle(&principal, ticket_id)
        .await?;

    let response = DeleteTicketResponse {
        message: "Ticket deleted successfully.".to_string(),
        moderator_stats: result.moderator_stats.as_ref().map(ModeratorStatsView::from),
    };
    Ok(Json(response))
}
