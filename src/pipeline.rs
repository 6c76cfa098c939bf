//! Request pipeline
//!
//! One classification request moves through: received → validated →
//! dispatched/failed → responded. The caller always gets a response
//! payload back; validation and backend failures are encoded as
//! `error: ...` sentinel strings in the `result` field, never as transport
//! faults.
//!
//! Latency recording and the inflight decrement live in a Drop guard, so
//! the bookkeeping runs on every exit path - including the handler future
//! being dropped when a caller disconnects mid-request.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::backend::{BackendClient, BackendError};
use crate::metrics::{AppMetrics, FailureReason, Verdict};

/// Sentinel result for empty or whitespace-only input.
pub const ERROR_EMPTY_MESSAGE: &str = "error: empty message";

/// Sentinel result for a failed backend dispatch.
pub const ERROR_BACKEND_UNAVAILABLE: &str = "error: backend unavailable";

/// The request/response payload of `POST /sms`.
///
/// Created per call, populated once by the pipeline, discarded after the
/// response is sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsMessage {
    pub sms: String,
    #[serde(default)]
    pub result: Option<String>,
}

/// Orchestrates one classification request end to end.
///
/// Holds shared references to the metrics surface and the backend
/// collaborator; both are constructed once at startup.
pub struct RequestPipeline {
    metrics: Arc<AppMetrics>,
    backend: Arc<dyn BackendClient>,
}

impl RequestPipeline {
    pub fn new(metrics: Arc<AppMetrics>, backend: Arc<dyn BackendClient>) -> Self {
        Self { metrics, backend }
    }

    /// Process one message. Infallible from the caller's point of view:
    /// every failure mode produces a populated response.
    pub async fn handle(&self, mut message: SmsMessage) -> SmsMessage {
        let _guard = RequestGuard::start(Arc::clone(&self.metrics));

        if message.sms.trim().is_empty() {
            tracing::info!("rejecting empty message");
            self.metrics.record_validation_error();
            message.result = Some(ERROR_EMPTY_MESSAGE.to_string());
            return message;
        }

        // Size is observed before dispatch so rejected-by-backend requests
        // still show up in the distribution.
        let char_count = message.sms.chars().count() as u64;
        self.metrics.message_length().observe(char_count);

        tracing::debug!(chars = char_count, "requesting prediction");
        match self.backend.classify(&message.sms).await {
            Ok(raw_verdict) => {
                self.metrics.record_backend_up();
                let verdict = Verdict::parse(&raw_verdict);
                self.metrics.record_verdict(verdict);
                tracing::info!(verdict = verdict.as_str(), "prediction received");
                message.result = Some(raw_verdict.trim().to_lowercase());
            }
            Err(err) => {
                let reason = failure_reason(&err);
                tracing::warn!(error = %err, reason = reason.as_str(), "backend dispatch failed");
                self.metrics.record_backend_failure(reason);
                message.result = Some(ERROR_BACKEND_UNAVAILABLE.to_string());
            }
        }

        message
    }
}

fn failure_reason(err: &BackendError) -> FailureReason {
    match err {
        BackendError::Timeout { .. } => FailureReason::Timeout,
        BackendError::Transport(_) => FailureReason::Transport,
        BackendError::Status { .. } => FailureReason::Status,
    }
}

/// Increments the inflight gauge on construction; records latency and
/// decrements it on drop. Drop runs when the enclosing future is dropped,
/// which covers caller disconnects.
struct RequestGuard {
    metrics: Arc<AppMetrics>,
    start: Instant,
}

impl RequestGuard {
    fn start(metrics: Arc<AppMetrics>) -> Self {
        metrics.inflight().inc();
        Self {
            metrics,
            start: Instant::now(),
        }
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.metrics
            .request_duration()
            .observe_duration(self.start.elapsed());
        self.metrics.inflight().dec();
    }
}
