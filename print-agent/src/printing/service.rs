//! Ticket print service - compose then deliver

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};
use tutto_printer::{DeliveryReport, PrintDriver, PrintError};

use super::renderer::ReceiptComposer;
use super::types::{CompositionError, Ticket, TicketPayload};

#[derive(Debug, Error)]
pub enum PrintServiceError {
    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error(transparent)]
    Delivery(#[from] PrintError),
}

pub type PrintServiceResult<T> = Result<T, PrintServiceError>;

/// Success body of `POST /imprimir`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintAck {
    pub mensaje: String,
}

impl PrintAck {
    pub fn printed() -> Self {
        Self {
            mensaje: "Ticket impreso exitosamente".to_string(),
        }
    }
}

/// Receipt print service
///
/// Stateless between requests: the composer and driver are shared.
#[derive(Clone)]
pub struct PrintService {
    composer: ReceiptComposer,
    driver: Arc<PrintDriver>,
}

impl PrintService {
    pub fn new(composer: ReceiptComposer, driver: Arc<PrintDriver>) -> Self {
        Self { composer, driver }
    }

    pub fn composer(&self) -> &ReceiptComposer {
        &self.composer
    }

    pub fn driver(&self) -> &PrintDriver {
        &self.driver
    }

    /// Validate, compose and deliver one ticket
    ///
    /// Nothing reaches the printer when validation fails.
    #[instrument(skip(self, payload))]
    pub async fn print(&self, payload: TicketPayload) -> PrintServiceResult<PrintAck> {
        let ticket = Ticket::try_from(payload)?;
        let report = self.print_ticket(&ticket).await?;
        info!(
            customer = %ticket.customer_name,
            items = ticket.line_items.len(),
            via = %report.via,
            fallback = report.used_fallback,
            "Ticket printed"
        );
        Ok(PrintAck::printed())
    }

    /// Compose and deliver an already validated ticket
    pub async fn print_ticket(&self, ticket: &Ticket) -> PrintServiceResult<DeliveryReport> {
        let document = self.composer.compose(ticket);
        Ok(self.driver.deliver(document.as_bytes()).await?)
    }
}
