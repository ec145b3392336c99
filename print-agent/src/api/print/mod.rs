//! Print API Module
//!
//! `POST /imprimir` - compose a ticket and send it to the receipt printer.

mod handler;

use axum::{Router, routing::post};

use crate::core::AgentState;

pub fn router() -> Router<AgentState> {
    Router::new().route("/imprimir", post(handler::print_ticket))
}
