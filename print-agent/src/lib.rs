//! Tutto Bene print agent
//!
//! Local HTTP service that turns POS orders into ESC/POS receipts and
//! hands them to the shop's thermal printer.
//!
//! # Modules
//!
//! - [`core`] - configuration, shared state, errors, server
//! - [`printing`] - ticket model, receipt composer, print service
//! - [`api`] - HTTP routes
//! - [`utils`] - logging

pub mod api;
pub mod core;
pub mod printing;
pub mod utils;

pub use core::{AgentError, AgentState, Config, Server};
pub use printing::{PrintService, ReceiptComposer, Ticket, TicketPayload};
