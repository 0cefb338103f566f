//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for a dservice client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Human-readable domain whose `dservice` record lists the backends.
    pub domain: String,

    /// Static endpoint that bypasses on-chain discovery entirely.
    pub api_endpoint: Option<String>,

    /// Name-resolution (ENS) settings.
    pub ens: EnsConfig,

    /// Request behaviour against discovered endpoints.
    pub fetch: FetchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// ENS lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EnsConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID (1 for Ethereum mainnet, 11155111 for Sepolia).
    pub chain_id: u64,

    /// Resolver contract to query instead of asking the registry.
    pub resolver_override: Option<String>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for EnsConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://eth.llamarpc.com".to_string(),
            failover_urls: Vec::new(),
            chain_id: 1,
            resolver_override: None,
            rpc_timeout_secs: 10,
        }
    }
}

/// Fetch behaviour configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Overall budget for one `fetch()` call across all endpoints.
    /// `None` leaves calls unbounded.
    pub default_deadline_secs: Option<u64>,

    /// Cap applied to each individual endpoint attempt.
    pub attempt_timeout_secs: Option<u64>,

    /// TCP connect timeout for the underlying HTTP client.
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            default_deadline_secs: None,
            attempt_timeout_secs: None,
            connect_timeout_secs: 5,
            user_agent: concat!("dservice-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
