//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the override endpoint and RPC URLs parse
//! - Check the resolver override is a valid address
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use alloy::primitives::Address;
use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("domain must not be empty")]
    EmptyDomain,

    #[error("api_endpoint '{0}' is not an http(s) URL")]
    InvalidApiEndpoint(String),

    #[error("ens RPC URL '{0}' is invalid")]
    InvalidRpcUrl(String),

    #[error("ens.resolver_override '{0}' is not an address")]
    InvalidResolverAddress(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.domain.trim().is_empty() {
        errors.push(ValidationError::EmptyDomain);
    }

    if let Some(endpoint) = &config.api_endpoint {
        let ok = Url::parse(endpoint)
            .map(|u| u.scheme() == "http" || u.scheme() == "https")
            .unwrap_or(false);
        if !ok {
            errors.push(ValidationError::InvalidApiEndpoint(endpoint.clone()));
        }
    }

    // RPC is only consulted when there is no static override.
    if config.api_endpoint.is_none() {
        for rpc in std::iter::once(&config.ens.rpc_url).chain(config.ens.failover_urls.iter()) {
            if Url::parse(rpc).is_err() {
                errors.push(ValidationError::InvalidRpcUrl(rpc.clone()));
            }
        }
    }

    if let Some(resolver) = &config.ens.resolver_override {
        if resolver.parse::<Address>().is_err() {
            errors.push(ValidationError::InvalidResolverAddress(resolver.clone()));
        }
    }

    if config.ens.rpc_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("ens.rpc_timeout_secs"));
    }
    if config.fetch.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("fetch.connect_timeout_secs"));
    }
    if config.fetch.default_deadline_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout("fetch.default_deadline_secs"));
    }
    if config.fetch.attempt_timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout("fetch.attempt_timeout_secs"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
