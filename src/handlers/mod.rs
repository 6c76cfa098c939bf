//! HTTP request handlers for the spamgate API

use crate::backend::BackendClient;
use crate::config::Config;
use crate::metrics::AppMetrics;
use crate::pipeline::RequestPipeline;
use std::sync::Arc;

pub mod classify;
pub mod health;
pub mod metrics;

/// Application state shared across all handlers
///
/// Contains configuration, the metrics surface, and the request pipeline.
/// All fields are Arc'd for cheap cloning across Axum handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    metrics: Arc<AppMetrics>,
    pipeline: Arc<RequestPipeline>,
}

impl AppState {
    /// Create a new AppState from configuration and a backend client.
    ///
    /// # Errors
    ///
    /// Fails if metric registration fails (duplicate names, invalid
    /// buckets) - a startup-fatal condition.
    pub fn new(
        config: Arc<Config>,
        backend: Arc<dyn BackendClient>,
    ) -> Result<Self, crate::metrics::MetricsError> {
        let metrics = Arc::new(AppMetrics::new()?);
        let pipeline = Arc::new(RequestPipeline::new(Arc::clone(&metrics), backend));

        Ok(Self {
            config,
            metrics,
            pipeline,
        })
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the metrics surface
    pub fn metrics(&self) -> &AppMetrics {
        &self.metrics
    }

    /// Get reference to the request pipeline
    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }
}
