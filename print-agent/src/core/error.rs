use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tutto_printer::PrintError;

use crate::printing::{CompositionError, PrintServiceError};

#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error(transparent)]
    Print(#[from] PrintError),
}

impl From<PrintServiceError> for AgentError {
    fn from(err: PrintServiceError) -> Self {
        match err {
            PrintServiceError::Composition(e) => Self::Composition(e),
            PrintServiceError::Delivery(e) => Self::Print(e),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl AgentError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Composition(_) => (StatusCode::BAD_REQUEST, "composition_error"),
            Self::Print(e) if e.is_timeout() => (StatusCode::SERVICE_UNAVAILABLE, "print_timeout"),
            Self::Print(PrintError::Staging { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "staging_error")
            }
            Self::Print(_) => (StatusCode::INTERNAL_SERVER_ERROR, "print_error"),
        }
    }
}

impl IntoResponse for AgentError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status();

        match &self {
            Self::Composition(e) => tracing::warn!(error = %e, "Rejected ticket"),
            Self::Print(e) => tracing::error!(error = %e, "Print failed"),
        }

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Handler result type
pub type Result<T> = std::result::Result<T, AgentError>;
