//! Delivery of composed documents to the OS print path
//!
//! - [`PrintDriver`] - stage → primary → fallback → cleanup
//! - [`DeliveryPlan`] / [`DeliveryStrategy`] - how the printer is addressed
//! - [`CommandRunner`] - seam over external print commands
//! - [`StagedDocument`] - transient file artifact

mod driver;
mod runner;
mod staging;
mod strategy;

pub use driver::{DeliveryReport, PrintDriver};
pub use runner::{CommandRunner, CommandSpec, ExitReport, ProcessRunner};
pub use staging::StagedDocument;
pub use strategy::{DEFAULT_WINDOWS_PORT, DeliveryPlan, DeliveryStrategy, PlanSettings};
