//! Health routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | / | GET | Liveness banner |
//! | /status | GET | Uptime, log location, delivery plan and printer reachability |

use axum::{Json, Router, extract::State, routing::get};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::core::AgentState;

pub fn router() -> Router<AgentState> {
    Router::new()
        .route("/", get(index))
        .route("/status", get(status))
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    status: &'static str,
    time: String,
    platform: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
    /// Log file location
    logs: String,
    /// Delivery plan, e.g. `spooler:POS-58 -> port:USB001`
    delivery: String,
    /// Only reported for network printers
    #[serde(skip_serializing_if = "Option::is_none")]
    printer_online: Option<bool>,
}

/// GET / - liveness banner
async fn index() -> Json<IndexResponse> {
    tracing::debug!("Index requested");
    Json(IndexResponse {
        status: "Print Agent running",
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        platform: std::env::consts::OS,
    })
}

/// GET /status
async fn status(State(state): State<AgentState>) -> Json<StatusResponse> {
    tracing::debug!("Status requested");
    Json(StatusResponse {
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
        logs: state.log_path().display().to_string(),
        delivery: state.print.driver().plan().to_string(),
        printer_online: state.print.driver().probe().await,
    })
}
