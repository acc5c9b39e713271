//! Ticket command/query handlers.

mod assigned_tickets;
mod create_ticket;
mod delete_ticket;
mod get_ticket;
mod list_tickets;
mod update_status;

pub use assigned_tickets::{AssignedTicketsHandler, AssignedTicketsResult};
pub use create_ticket::{CreateTicketCommand, CreateTicketHandler, CreateTicketResult};
pub use delete_ticket::{DeleteTicketHandler, DeleteTicketResult};
pub use get_ticket::GetTicketHandler;
pub use list_tickets::ListTicketsHandler;
pub use update_status::{
    UpdateTicketStatusCommand, UpdateTicketStatusHandler, UpdateTicketStatusResult,
};
