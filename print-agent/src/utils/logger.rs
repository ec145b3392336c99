//! Logging Infrastructure
//!
//! Console output plus a single append-mode file in the configured log directory.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::core::state::LOG_FILE_NAME;

/// Build the filter: `RUST_LOG` wins over the configured level
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{default_level},tower_http=info,hyper=warn"))
    })
}

/// Writer for `<log_dir>/print-agent.log`, appended across restarts
pub fn file_appender(log_dir: &Path) -> RollingFileAppender {
    rolling::never(log_dir, LOG_FILE_NAME)
}

/// Initialize the global subscriber
///
/// The returned guard flushes the file writer on drop; keep it alive for
/// the lifetime of the process.
pub fn init_logger(log_level: &str, log_dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender(log_dir));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_writer(non_blocking_file);

    let stdout_layer = fmt::layer()
        .with_ansi(true)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(std::io::Error::other)?;

    tracing::info!(path = %log_dir.display(), "Tracing initialized");
    Ok(guard)
}

/// Log panics through tracing, then terminate the process
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        let msg = info.to_string();
        eprintln!("!!! PRINT AGENT PANIC !!!\nMessage: {}\nBacktrace:\n{}", msg, backtrace);
        tracing::error!(target: "panic", message = %msg, backtrace = %backtrace, "panic occurred");
        std::process::exit(1);
    }));
}
