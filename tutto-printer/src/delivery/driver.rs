//! Print driver
//!
//! Runs one delivery through its plan:
//! primary → fallback (if defined) → cleanup. The document is staged right
//! before the first attempt that reads it from a file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::delivery::runner::CommandRunner;
use crate::delivery::staging::StagedDocument;
use crate::delivery::strategy::{DeliveryPlan, DeliveryStrategy};
use crate::error::{PrintError, PrintResult};
use crate::printer::Printer;

/// Outcome of a successful delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Strategy that accepted the document
    pub via: String,
    /// Whether the primary strategy failed first
    pub used_fallback: bool,
}

/// Delivers composed documents through a [`DeliveryPlan`]
///
/// Holds no per-request state; one driver is shared by all requests.
pub struct PrintDriver {
    plan: DeliveryPlan,
    staging_dir: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl PrintDriver {
    pub fn new(
        plan: DeliveryPlan,
        staging_dir: impl Into<PathBuf>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            plan,
            staging_dir: staging_dir.into(),
            runner,
        }
    }

    pub fn plan(&self) -> &DeliveryPlan {
        &self.plan
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Reachability of a network primary; `None` for OS print paths
    pub async fn probe(&self) -> Option<bool> {
        match &self.plan.primary {
            DeliveryStrategy::Network(printer) => Some(printer.is_online().await),
            _ => None,
        }
    }

    /// Deliver `document` to the printer
    ///
    /// The fallback is tried exactly once, and only after the primary
    /// failed. Any staged file is gone when this returns.
    #[instrument(skip(self, document), fields(bytes = document.len(), plan = %self.plan))]
    pub async fn deliver(&self, document: &[u8]) -> PrintResult<DeliveryReport> {
        // Written on first use, removed when dropped
        let mut staged: Option<StagedDocument> = None;

        let primary = &self.plan.primary;
        self.stage_for(primary, document, &mut staged)?;
        let primary_err = match self.attempt(primary, document, staged.as_ref()).await {
            Ok(()) => {
                info!(via = %primary, "Ticket delivered");
                return Ok(DeliveryReport {
                    via: primary.to_string(),
                    used_fallback: false,
                });
            }
            Err(e) => e,
        };

        let Some(fallback) = &self.plan.fallback else {
            error!(via = %primary, error = %primary_err, "Delivery failed");
            return Err(primary_err);
        };

        warn!(via = %primary, error = %primary_err, fallback = %fallback, "Primary print path failed, trying fallback");

        let fallback_result = match self.stage_for(fallback, document, &mut staged) {
            Ok(()) => self.attempt(fallback, document, staged.as_ref()).await,
            Err(e) => Err(e),
        };

        match fallback_result {
            Ok(()) => {
                info!(via = %fallback, "Ticket delivered through fallback");
                Ok(DeliveryReport {
                    via: fallback.to_string(),
                    used_fallback: true,
                })
            }
            Err(fallback_err) => {
                error!(via = %fallback, error = %fallback_err, "Fallback delivery failed");
                Err(PrintError::Exhausted {
                    primary_path: primary.to_string(),
                    primary: Box::new(primary_err),
                    fallback_path: fallback.to_string(),
                    fallback: Box::new(fallback_err),
                })
            }
        }
    }

    /// Stage `document` if `strategy` reads a file and nothing is staged yet
    fn stage_for(
        &self,
        strategy: &DeliveryStrategy,
        document: &[u8],
        staged: &mut Option<StagedDocument>,
    ) -> PrintResult<()> {
        if strategy.needs_staging() && staged.is_none() {
            *staged = Some(StagedDocument::stage(&self.staging_dir, document)?);
        }
        Ok(())
    }

    async fn attempt(
        &self,
        strategy: &DeliveryStrategy,
        document: &[u8],
        staged: Option<&StagedDocument>,
    ) -> PrintResult<()> {
        if let DeliveryStrategy::Network(printer) = strategy {
            return printer.print(document).await;
        }

        let command = strategy.command(staged.map(StagedDocument::path))?;
        let stdin = strategy.streams_stdin().then_some(document);
        self.runner
            .run(&command, stdin)
            .await?
            .into_result(&command.program)
    }
}
