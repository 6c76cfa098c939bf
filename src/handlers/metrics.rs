//! Prometheus metrics endpoint
//!
//! Exposes metrics in Prometheus text format for scraping.

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::handlers::AppState;

/// Content type of the text exposition format.
const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Metrics handler for Prometheus scraping
///
/// Returns the full registry render. Rendering takes independent atomic
/// snapshots per sample and never blocks the request-handling path.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/metrics
/// # HELP spamgate_predictions_total Total classified messages by verdict
/// # TYPE spamgate_predictions_total counter
/// spamgate_predictions_total{verdict="ham"} 12
/// ```
pub async fn handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        state.metrics().render(),
    )
}
