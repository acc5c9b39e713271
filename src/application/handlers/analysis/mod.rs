//! Analysis pipeline handlers.

mod process_ticket;

pub use process_ticket::{ProcessTicketHandler, ProcessTicketResult};
