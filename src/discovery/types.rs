//! Discovery identity and error definitions.

use thiserror::Error;

use crate::blockchain::BlockchainError;

/// Text-record key under which endpoint lists are published.
pub const DSERVICE_KEY: &str = "dservice";

/// Who we are looking up, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    /// Human-readable domain, e.g. `app.eth`.
    pub domain: String,
    /// Endpoint that replaces discovery when present.
    pub static_override: Option<String>,
}

impl ServiceIdentity {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            static_override: None,
        }
    }

    pub fn with_override(mut self, endpoint: impl Into<String>) -> Self {
        self.static_override = Some(endpoint.into());
        self
    }
}

/// Errors raised while discovering the endpoint set.
///
/// `Clone` because the outcome is shared with every caller waiting on
/// readiness.
#[derive(Debug, Clone, Error)]
pub enum DiscoveryError {
    /// The domain has no resolver registered.
    #[error("no resolver registered for {domain}")]
    NoResolver { domain: String },

    /// The resolver has no `dservice` record, or it is empty.
    #[error("no dservice record published for {domain}")]
    EmptyRecord { domain: String },

    /// The record held only whitespace and blank lines.
    #[error("dservice record for {domain} lists no endpoints")]
    NoEndpoints { domain: String },

    /// `init()` was dropped before discovery finished.
    #[error("discovery for {domain} was cancelled before completing")]
    Interrupted { domain: String },

    /// The lookup collaborator failed.
    #[error(transparent)]
    Lookup(#[from] BlockchainError),
}

/// Result type for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
