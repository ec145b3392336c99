//! Print API Handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::core::{AgentState, Result};
use crate::printing::{CompositionError, PrintAck, TicketPayload};

/// POST /imprimir - print one ticket
///
/// Body rejections (bad JSON, wrong types, missing content type) are
/// reported as composition errors, like any other unprintable ticket.
pub async fn print_ticket(
    State(state): State<AgentState>,
    payload: std::result::Result<Json<TicketPayload>, JsonRejection>,
) -> Result<Json<PrintAck>> {
    let Json(payload) = payload.map_err(|e| CompositionError::Malformed(e.body_text()))?;

    tracing::info!("Print request received");
    let ack = state.print.print(payload).await?;
    Ok(Json(ack))
}
