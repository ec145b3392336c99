//! # tutto-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command table and builder
//! - Latin accent folding and Windows-1252 encoding
//! - Delivery through the OS print path (spooler, raw port, `lp`)
//! - Network printing (TCP port 9100)
//!
//! Business logic (WHAT to print) stays in application code:
//! - Receipt rendering → print-agent
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tutto_printer::{DeliveryPlan, EscPosBuilder, PrintDriver, ProcessRunner};
//!
//! // Build ESC/POS content
//! let mut builder = EscPosBuilder::new(32);
//! builder.center();
//! builder.double_size();
//! builder.line("TUTTO BENE");
//! builder.reset_size();
//! builder.sep_single();
//! builder.left();
//! builder.line("Cliente: María");
//! builder.cut();
//!
//! // Deliver through the platform's print path
//! let plan = DeliveryPlan::for_platform(&settings)?;
//! let driver = PrintDriver::new(plan, std::env::temp_dir(), Arc::new(ProcessRunner::default()));
//! driver.deliver(&builder.build()).await?;
//! ```

pub mod delivery;
mod encoding;
mod error;
mod escpos;
mod printer;

// Re-exports
pub use delivery::{
    CommandRunner, CommandSpec, DeliveryPlan, DeliveryReport, DeliveryStrategy, ExitReport,
    PlanSettings, PrintDriver, ProcessRunner, StagedDocument,
};
pub use encoding::{convert_to_cp1252, normalize_text, text_width};
pub use error::{PrintError, PrintResult};
pub use escpos::{EscPosBuilder, cmd};
pub use printer::{DEFAULT_RAW_PORT, NetworkPrinter, Printer};
