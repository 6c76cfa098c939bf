//! Error types for spamgate
//!
//! Domain-level failures (validation, backend unavailability) never escape
//! the pipeline; they surface as sentinel strings in the response payload.
//! What remains here are the fatal startup categories plus the server's
//! own bind/serve failures.

use thiserror::Error;

use crate::config::ConfigError;
use crate::metrics::MetricsError;

/// Fatal application errors. Any of these aborts startup.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("metrics registration error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("failed to build backend client: {0}")]
    BackendClient(String),

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
