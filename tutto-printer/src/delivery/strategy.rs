//! Delivery strategies and the per-platform plan
//!
//! A [`DeliveryPlan`] is chosen once at startup: a primary strategy and,
//! where the platform has one, a fallback that addresses the printer a
//! different way.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::delivery::runner::CommandSpec;
use crate::error::{PrintError, PrintResult};
use crate::printer::NetworkPrinter;

/// Raw port used as the Windows fallback when none is configured
pub const DEFAULT_WINDOWS_PORT: &str = "USB001";

/// One way of handing a document to the OS print path
#[derive(Debug, Clone)]
pub enum DeliveryStrategy {
    /// Staged file sent to a logical printer by name
    SpoolerByName { printer: String },
    /// Staged file copied onto a raw device or port path
    RawPortWrite { port: String },
    /// Document streamed to `lp` on stdin, nothing staged
    LinePrinterStream { destination: String },
    /// Raw TCP (port 9100) printer
    Network(NetworkPrinter),
}

impl DeliveryStrategy {
    /// Whether this strategy reads the document from a staged file
    pub fn needs_staging(&self) -> bool {
        matches!(self, Self::SpoolerByName { .. } | Self::RawPortWrite { .. })
    }

    /// Whether this strategy feeds the document on the command's stdin
    pub fn streams_stdin(&self) -> bool {
        matches!(self, Self::LinePrinterStream { .. })
    }

    /// Build the OS command for this strategy
    ///
    /// `staged` must be given for strategies that [`need staging`](Self::needs_staging).
    pub fn command(&self, staged: Option<&Path>) -> PrintResult<CommandSpec> {
        match self {
            Self::SpoolerByName { printer } => {
                let file = staged_arg(self, staged)?;
                if cfg!(windows) {
                    let share = format!(r"\\localhost\{}", printer);
                    Ok(CommandSpec::new("cmd", ["/C", "copy", "/B", file.as_str(), share.as_str()]))
                } else {
                    Ok(CommandSpec::new("lp", ["-d", printer.as_str(), "-o", "raw", file.as_str()]))
                }
            }
            Self::RawPortWrite { port } => {
                let file = staged_arg(self, staged)?;
                if cfg!(windows) {
                    Ok(CommandSpec::new("cmd", ["/C", "copy", "/B", file.as_str(), port.as_str()]))
                } else {
                    Ok(CommandSpec::new("cp", [file.as_str(), port.as_str()]))
                }
            }
            Self::LinePrinterStream { destination } => Ok(CommandSpec::new(
                "lp",
                ["-d", destination.as_str(), "-o", "raw", "-"],
            )),
            Self::Network(printer) => Err(PrintError::InvalidConfig(format!(
                "network printer {} is not driven by a command",
                printer.addr()
            ))),
        }
    }
}

fn staged_arg(strategy: &DeliveryStrategy, staged: Option<&Path>) -> PrintResult<String> {
    staged
        .map(|p| p.to_string_lossy().into_owned())
        .ok_or_else(|| PrintError::InvalidConfig(format!("{} requires a staged document", strategy)))
}

impl fmt::Display for DeliveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpoolerByName { printer } => write!(f, "spooler:{}", printer),
            Self::RawPortWrite { port } => write!(f, "port:{}", port),
            Self::LinePrinterStream { destination } => write!(f, "lp:{}", destination),
            Self::Network(printer) => write!(f, "tcp:{}", printer.addr()),
        }
    }
}

/// Inputs for choosing a [`DeliveryPlan`]
#[derive(Debug, Clone)]
pub struct PlanSettings {
    /// Logical printer name for the spooler
    pub printer_name: String,
    /// Raw device/port path used as fallback
    pub printer_port: Option<String>,
    /// `lp` destination on non-Windows hosts
    pub lp_destination: String,
    /// Raw TCP printer address; overrides the platform choice
    pub network_addr: Option<String>,
    /// Bound on network printer connect + write
    pub timeout: Duration,
}

/// Primary strategy plus optional fallback
#[derive(Debug, Clone)]
pub struct DeliveryPlan {
    pub primary: DeliveryStrategy,
    pub fallback: Option<DeliveryStrategy>,
}

impl DeliveryPlan {
    pub fn new(primary: DeliveryStrategy) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: DeliveryStrategy) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Choose the plan for the running platform
    pub fn for_platform(settings: &PlanSettings) -> PrintResult<Self> {
        Self::for_os(std::env::consts::OS, settings)
    }

    /// Choose the plan for `os` (as in [`std::env::consts::OS`])
    pub fn for_os(os: &str, settings: &PlanSettings) -> PrintResult<Self> {
        if let Some(addr) = &settings.network_addr {
            let printer = NetworkPrinter::from_addr(addr)?.with_timeout(settings.timeout);
            return Ok(Self::new(DeliveryStrategy::Network(printer)));
        }

        if os == "windows" {
            let port = settings
                .printer_port
                .clone()
                .unwrap_or_else(|| DEFAULT_WINDOWS_PORT.to_string());
            return Ok(Self::new(DeliveryStrategy::SpoolerByName {
                printer: settings.printer_name.clone(),
            })
            .with_fallback(DeliveryStrategy::RawPortWrite { port }));
        }

        let plan = Self::new(DeliveryStrategy::LinePrinterStream {
            destination: settings.lp_destination.clone(),
        });
        Ok(match &settings.printer_port {
            Some(port) => plan.with_fallback(DeliveryStrategy::RawPortWrite { port: port.clone() }),
            None => plan,
        })
    }

    /// Whether any strategy in the plan reads a staged file
    pub fn needs_staging(&self) -> bool {
        self.primary.needs_staging()
            || self
                .fallback
                .as_ref()
                .is_some_and(DeliveryStrategy::needs_staging)
    }
}

impl fmt::Display for DeliveryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fallback {
            Some(fallback) => write!(f, "{} -> {}", self.primary, fallback),
            None => write!(f, "{}", self.primary),
        }
    }
}
