//! Per-response failover policy.
//!
//! # Policy Table
//! ```text
//! 2xx, 3xx          → Success    return the response
//! 4xx               → Client     surface immediately, no failover
//! 5xx, 1xx          → Transient  try the next endpoint
//! transport/timeout → Transient  try the next endpoint
//! ```
//! A 4xx means the request itself is at fault, so replaying it elsewhere
//! would only repeat the rejection.

use reqwest::StatusCode;

/// Classification of one endpoint attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    Client,
    Transient,
}

impl AttemptOutcome {
    /// Label used for metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            AttemptOutcome::Success => "success",
            AttemptOutcome::Client => "client_error",
            AttemptOutcome::Transient => "transient_error",
        }
    }
}

/// Classify a received status code.
pub fn classify(status: StatusCode) -> AttemptOutcome {
    if status.is_success() || status.is_redirection() {
        AttemptOutcome::Success
    } else if status.is_client_error() {
        AttemptOutcome::Client
    } else {
        AttemptOutcome::Transient
    }
}
