//! Errors surfaced by `fetch()`.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::discovery::DiscoveryError;

/// Why a single endpoint attempt was abandoned.
#[derive(Debug, Error)]
pub enum AttemptFailure {
    /// No response was received.
    #[error("{endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a 5xx.
    #[error("{endpoint}: HTTP {status}")]
    Status { endpoint: String, status: StatusCode },

    /// The attempt ran out of its time budget.
    #[error("{endpoint}: no response within {after:?}")]
    Timeout { endpoint: String, after: Duration },
}

impl AttemptFailure {
    pub fn endpoint(&self) -> &str {
        match self {
            AttemptFailure::Transport { endpoint, .. }
            | AttemptFailure::Status { endpoint, .. }
            | AttemptFailure::Timeout { endpoint, .. } => endpoint,
        }
    }
}

/// Errors that can occur during a `fetch()` call.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Discovery failed; no request was made.
    #[error("service discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    /// The finalized endpoint set is empty.
    #[error("no endpoints available")]
    NoEndpoints,

    /// The endpoint rejected the request with a 4xx. Never retried.
    #[error("client error {code} {status_text} from {endpoint}", code = .status.as_u16())]
    Client {
        status: StatusCode,
        status_text: String,
        endpoint: String,
    },

    /// Every endpoint failed with a transport error, timeout or 5xx.
    #[error("all {attempts} endpoint(s) failed, last: {last}")]
    AllEndpointsFailed {
        attempts: usize,
        #[source]
        last: AttemptFailure,
    },

    /// The caller's deadline elapsed before any endpoint succeeded.
    ///
    /// `last` is the most recent failed attempt, if one completed.
    #[error("deadline of {deadline:?} exceeded after {attempts} attempt(s)")]
    DeadlineExceeded {
        deadline: Duration,
        attempts: usize,
        #[source]
        last: Option<AttemptFailure>,
    },
}

impl FetchError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Client { status, .. } => Some(*status),
            FetchError::AllEndpointsFailed {
                last: AttemptFailure::Status { status, .. },
                ..
            }
            | FetchError::DeadlineExceeded {
                last: Some(AttemptFailure::Status { status, .. }),
                ..
            } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;
