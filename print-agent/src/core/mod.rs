//! Core module - configuration, state and errors
//!
//! - [`Config`] - agent configuration
//! - [`AgentState`] - shared handler state
//! - [`Server`] - HTTP server
//! - [`AgentError`] - request boundary error

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{AgentError, Result};
pub use server::Server;
pub use state::AgentState;
