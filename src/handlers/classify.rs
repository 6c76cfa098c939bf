//! Classification endpoint handler
//!
//! Handles POST /sms: forwards the message to the backend via the request
//! pipeline and returns the payload with the `result` field populated.
//!
//! Domain-level failures never change the HTTP status. A validation error
//! or an unreachable backend still yields 200 with an `error: ...`
//! sentinel in `result`; only malformed JSON gets a 4xx (from the Json
//! extractor itself).

use axum::{Json, extract::State};

use crate::handlers::AppState;
use crate::pipeline::SmsMessage;

/// POST /sms handler
pub async fn handler(State(state): State<AppState>, Json(message): Json<SmsMessage>) -> Json<SmsMessage> {
    Json(state.pipeline().handle(message).await)
}
