use anyhow::Context;
use print_agent::utils::{init_logger, install_panic_hook};
use print_agent::{AgentState, Config, Server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenv::dotenv().ok();

    let config = Config::from_env();

    let _log_guard = init_logger(&config.log_level, &config.log_dir)
        .with_context(|| format!("failed to initialize logging in {}", config.log_dir.display()))?;
    install_panic_hook();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        platform = std::env::consts::OS,
        printer = %config.printer_name,
        "Print agent starting"
    );

    let state = AgentState::initialize(config).context("invalid printer configuration")?;

    Server::new(state)
        .run()
        .await
        .context("HTTP server failed")?;

    tracing::info!("Print agent stopped");
    Ok(())
}
