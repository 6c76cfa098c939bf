//! Spamgate - SMS spam-classification edge service
//!
//! Accepts a short text message over HTTP, forwards it to a remote
//! classification backend, and returns the verdict, while maintaining
//! in-process request metrics exposed in Prometheus text format.

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod pipeline;
pub mod telemetry;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers::AppState;

/// Build the full application router: classification, redirect, metrics,
/// and health, with request-id and trace middleware applied.
pub fn app(state: AppState) -> Router {
    // Relative REST requests from clients end up on /sms/ rather than /sms,
    // so the bare path permanently redirects to the trailing-slash form.
    Router::new()
        .route(
            "/sms",
            post(handlers::classify::handler)
                .get(|| async { axum::response::Redirect::permanent("/sms/") }),
        )
        .route("/sms/", post(handlers::classify::handler))
        .route("/metrics", get(handlers::metrics::handler))
        .route("/health", get(handlers::health::handler))
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
