//! Server Implementation
//!
//! Binds the HTTP listener and serves until Ctrl+C.

use tokio::net::TcpListener;

use crate::api;
use crate::core::AgentState;

/// HTTP Server
pub struct Server {
    state: AgentState,
}

impl Server {
    pub fn new(state: AgentState) -> Self {
        Self { state }
    }

    pub async fn run(self) -> std::io::Result<()> {
        let addr = self.state.config.bind_addr();
        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Print agent listening on http://{}", listener.local_addr()?);

        let app = api::build_app(self.state);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
