//! API routes
//!
//! - [`health`] - liveness and status
//! - [`print`] - ticket printing

pub mod health;
pub mod print;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::core::AgentState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<AgentState> {
    Router::new()
        .merge(health::router())
        .merge(print::router())
}

/// Build the application served by [`Server`](crate::core::Server)
///
/// Also used by tests to drive requests through `oneshot`.
pub fn build_app(state: AgentState) -> Router {
    build_router()
        // Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
