//! In-process metrics for spamgate
//!
//! A hand-built concurrent aggregation engine: counters, gauges, and
//! histograms backed by `std::sync::atomic`, registered once at startup in
//! a [`Registry`] and rendered in Prometheus text exposition format by the
//! `/metrics` endpoint.
//!
//! Writers never take a lock; readers never block writers. The only shared
//! mutable state in the whole service lives here.

mod bucket;
mod counter;
mod histogram;
mod registry;

pub use bucket::{BucketSet, MAX_BUCKETS};
pub use counter::{Counter, Gauge};
pub use histogram::{Histogram, HistogramSnapshot};
pub use registry::{MetricsError, Registry};

use std::sync::Arc;

/// Classification outcome label for `spamgate_predictions_total`.
///
/// Restricting verdicts to a closed enum bounds label cardinality: a
/// backend returning anything other than "ham" or "spam" is folded into
/// `Unknown` instead of minting a new time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ham,
    Spam,
    Unknown,
}

impl Verdict {
    /// Parse a backend verdict string. Comparison is case-insensitive;
    /// surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ham" => Verdict::Ham,
            "spam" => Verdict::Spam,
            _ => Verdict::Unknown,
        }
    }

    /// Prometheus label value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Ham => "ham",
            Verdict::Spam => "spam",
            Verdict::Unknown => "unknown",
        }
    }
}

/// Failure category label for `spamgate_backend_failures_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Timeout,
    Transport,
    Status,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::Timeout => "timeout",
            FailureReason::Transport => "transport",
            FailureReason::Status => "status",
        }
    }
}

/// Latency bucket boundaries in microseconds, rendered in seconds.
const LATENCY_BUCKETS_MICROS: [u64; 10] = [
    5_000, 10_000, 25_000, 50_000, 100_000, 250_000, 500_000, 1_000_000, 2_500_000, 5_000_000,
];

/// Message-size bucket boundaries in characters.
const SIZE_BUCKETS_CHARS: [u64; 8] = [8, 16, 32, 64, 128, 256, 512, 1024];

/// The full metric surface of the service.
///
/// Constructed once at startup and shared via `Arc`; every component that
/// records or renders receives a reference explicitly, never through a
/// process-wide global, so tests can build an isolated instance per case.
pub struct AppMetrics {
    registry: Registry,
    predictions: Arc<Counter>,
    validation_errors: Arc<Counter>,
    backend_failures: Arc<Counter>,
    inflight: Arc<Gauge>,
    backend_up: Arc<Gauge>,
    request_duration: Arc<Histogram>,
    message_length: Arc<Histogram>,
}

impl AppMetrics {
    /// Construct and register every metric family.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError` on a duplicate name or invalid bucket layout.
    /// Both are programmer errors and abort startup.
    pub fn new() -> Result<Self, MetricsError> {
        let mut registry = Registry::new();

        let predictions = Arc::new(Counter::new("verdict", &["ham", "spam", "unknown"]));
        registry.register_counter(
            "spamgate_predictions_total",
            "Total classified messages by verdict",
            Arc::clone(&predictions),
        )?;

        let validation_errors = Arc::new(Counter::new("reason", &["empty"]));
        registry.register_counter(
            "spamgate_validation_errors_total",
            "Total requests rejected before dispatch by reason",
            Arc::clone(&validation_errors),
        )?;

        let backend_failures = Arc::new(Counter::new("reason", &["timeout", "transport", "status"]));
        registry.register_counter(
            "spamgate_backend_failures_total",
            "Total classification dispatch failures by reason",
            Arc::clone(&backend_failures),
        )?;

        let inflight = Arc::new(Gauge::new());
        registry.register_gauge(
            "spamgate_inflight_requests",
            "Requests currently being processed",
            Arc::clone(&inflight),
        )?;

        let backend_up = Arc::new(Gauge::new());
        registry.register_gauge(
            "spamgate_backend_up",
            "Whether the last classification dispatch succeeded (1 = up)",
            Arc::clone(&backend_up),
        )?;

        let request_duration = Arc::new(Histogram::new(
            BucketSet::new(LATENCY_BUCKETS_MICROS.to_vec())?,
            1_000_000,
        ));
        registry.register_histogram(
            "spamgate_request_duration_seconds",
            "End-to-end request latency in seconds",
            Arc::clone(&request_duration),
        )?;

        let message_length = Arc::new(Histogram::new(
            BucketSet::new(SIZE_BUCKETS_CHARS.to_vec())?,
            1,
        ));
        registry.register_histogram(
            "spamgate_message_length_chars",
            "Length of accepted messages in Unicode characters",
            Arc::clone(&message_length),
        )?;

        Ok(Self {
            registry,
            predictions,
            validation_errors,
            backend_failures,
            inflight,
            backend_up,
            request_duration,
            message_length,
        })
    }

    /// Record a classification verdict.
    pub fn record_verdict(&self, verdict: Verdict) {
        self.predictions.inc(verdict.as_str());
    }

    /// Record an input rejected before dispatch (currently only "empty").
    pub fn record_validation_error(&self) {
        self.validation_errors.inc("empty");
    }

    /// Record a failed dispatch and flip the health flag down.
    pub fn record_backend_failure(&self, reason: FailureReason) {
        self.backend_failures.inc(reason.as_str());
        self.backend_up.set(0);
    }

    /// Mark the backend healthy after a successful dispatch.
    pub fn record_backend_up(&self) {
        self.backend_up.set(1);
    }

    /// Requests currently being processed.
    pub fn inflight(&self) -> &Gauge {
        &self.inflight
    }

    /// Backend health flag (1 = up, 0 = degraded).
    pub fn backend_up(&self) -> &Gauge {
        &self.backend_up
    }

    /// Verdict counter handle.
    pub fn predictions(&self) -> &Counter {
        &self.predictions
    }

    /// Validation-error counter handle.
    pub fn validation_errors(&self) -> &Counter {
        &self.validation_errors
    }

    /// Dispatch-failure counter handle.
    pub fn backend_failures(&self) -> &Counter {
        &self.backend_failures
    }

    /// End-to-end latency histogram.
    pub fn request_duration(&self) -> &Histogram {
        &self.request_duration
    }

    /// Accepted-message size histogram.
    pub fn message_length(&self) -> &Histogram {
        &self.message_length
    }

    /// Render the full exposition document.
    pub fn render(&self) -> String {
        self.registry.render()
    }
}
