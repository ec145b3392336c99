//! Receipt Printing Module
//!
//! - [`types`] - ticket model and the JSON payload posted by the POS
//! - [`renderer`] - ESC/POS receipt layout
//! - [`service`] - compose and deliver

pub mod renderer;
pub mod service;
pub mod types;

pub use renderer::{ComposedDocument, ReceiptComposer, StoreHeader, format_money};
pub use service::{PrintAck, PrintService, PrintServiceError, PrintServiceResult};
pub use types::*;
