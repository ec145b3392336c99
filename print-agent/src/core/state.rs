use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tutto_printer::{CommandRunner, DeliveryPlan, PrintDriver, PrintResult, ProcessRunner};

use crate::core::Config;
use crate::printing::{PrintService, ReceiptComposer};

/// Log file name inside the log directory
pub const LOG_FILE_NAME: &str = "print-agent.log";

/// Shared application state
///
/// Cloned into every handler; all fields are cheap to clone.
#[derive(Clone)]
pub struct AgentState {
    pub config: Arc<Config>,
    pub print: PrintService,
    pub started_at: Instant,
}

impl AgentState {
    /// Build state with the real process runner
    pub fn initialize(config: Config) -> PrintResult<Self> {
        let runner = Arc::new(ProcessRunner::new(config.print_timeout()));
        Self::with_runner(config, runner)
    }

    /// Build state around a custom command runner
    pub fn with_runner(config: Config, runner: Arc<dyn CommandRunner>) -> PrintResult<Self> {
        let plan = DeliveryPlan::for_platform(&config.plan_settings())?;
        Ok(Self::with_plan(config, plan, runner))
    }

    /// Build state with an explicit delivery plan
    pub fn with_plan(config: Config, plan: DeliveryPlan, runner: Arc<dyn CommandRunner>) -> Self {
        tracing::info!(plan = %plan, staging_dir = %config.staging_dir.display(), "Delivery plan selected");

        let driver = PrintDriver::new(plan, config.staging_dir.clone(), runner);
        let composer = ReceiptComposer::new(config.paper_width, config.store.clone());

        Self {
            print: PrintService::new(composer, Arc::new(driver)),
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// The log file written by the file layer
    pub fn log_path(&self) -> PathBuf {
        self.config.log_dir.join(LOG_FILE_NAME)
    }
}
