//! Health check endpoint
//!
//! Provides a simple health check for monitoring and load balancers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::handlers::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Classification backend status: "up" or "down"
    pub backend: &'static str,
}

/// Health check handler
///
/// Returns 200 OK with the service status and the backend health flag.
/// The backend flag reflects the outcome of the most recent dispatch; it
/// starts at "down" until the first successful classification.
pub async fn handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let backend = if state.metrics().backend_up().get() == 1 {
        "up"
    } else {
        "down"
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK",
            backend,
        }),
    )
}
