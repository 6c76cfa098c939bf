//! Classification backend client
//!
//! The pipeline only depends on the [`BackendClient`] trait:
//! `classify(text) -> verdict or BackendError`. The production
//! implementation posts JSON to `{MODEL_HOST}/predict` with a bounded
//! total timeout so a stalled backend cannot pin worker tasks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::error::AppError;

/// Dispatch failures, bucketed the way the failure counter labels them.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("classification request timed out after {timeout_seconds}s")]
    Timeout { timeout_seconds: u64 },

    #[error("classification backend unreachable: {0}")]
    Transport(String),

    #[error("classification backend returned HTTP {status}")]
    Status { status: u16 },
}

/// One-operation collaborator the pipeline dispatches to.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Classify `text`, returning the raw verdict string.
    async fn classify(&self, text: &str) -> Result<String, BackendError>;
}

/// Wire payload shared with the backend's `/predict` endpoint.
#[derive(Debug, Serialize, Deserialize)]
struct PredictPayload {
    sms: String,
    #[serde(default)]
    result: Option<String>,
}

/// reqwest-backed [`BackendClient`] talking to the configured MODEL_HOST.
pub struct HttpBackendClient {
    predict_url: String,
    timeout_seconds: u64,
    http: reqwest::Client,
}

impl HttpBackendClient {
    /// Build a client from configuration. The timeout covers the whole
    /// request including connect, send, and body read.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::BackendClient(e.to_string()))?;

        Ok(Self {
            predict_url: format!("{}/predict", config.model_host()),
            timeout_seconds: config.request_timeout().as_secs(),
            http,
        })
    }

    fn map_error(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            return BackendError::Timeout {
                timeout_seconds: self.timeout_seconds,
            };
        }
        if let Some(status) = err.status() {
            return BackendError::Status {
                status: status.as_u16(),
            };
        }
        BackendError::Transport(err.to_string())
    }
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    async fn classify(&self, text: &str) -> Result<String, BackendError> {
        let payload = PredictPayload {
            sms: text.to_string(),
            result: None,
        };

        let response = self
            .http
            .post(&self.predict_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let response = response.error_for_status().map_err(|e| self.map_error(e))?;

        let body: PredictPayload = response.json().await.map_err(|e| self.map_error(e))?;

        // A 2xx reply without a verdict is a protocol violation, not a
        // verdict we could classify.
        body.result.ok_or_else(|| {
            BackendError::Transport("backend reply is missing the result field".to_string())
        })
    }
}
