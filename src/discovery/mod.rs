//! Endpoint discovery subsystem.
//!
//! # Data Flow
//! ```text
//! ServiceIdentity
//!     → static override? → [override]           (resolver never consulted)
//!     → else TextRecordResolver("dservice")
//!         → no resolver / empty value → DiscoveryError
//!         → record.rs (split lines, trim, drop blanks)
//!         → non-empty Vec<String>
//! ```

pub mod record;
pub mod types;

pub use record::parse_endpoints;
pub use types::{DiscoveryError, DiscoveryResult, ServiceIdentity, DSERVICE_KEY};

use crate::blockchain::{ChainContext, TextRecordResolver};
use crate::observability::metrics;

/// Resolve the candidate endpoints for `identity`.
///
/// A static override always wins and short-circuits the lookup.
pub async fn resolve(
    identity: &ServiceIdentity,
    resolver: &dyn TextRecordResolver,
    context: ChainContext,
) -> DiscoveryResult<Vec<String>> {
    if let Some(endpoint) = &identity.static_override {
        tracing::info!(domain = %identity.domain, endpoint = %endpoint, "Using static endpoint, skipping discovery");
        metrics::record_discovery("static");
        return Ok(vec![endpoint.clone()]);
    }

    let result = lookup(identity, resolver, context).await;
    metrics::record_discovery(if result.is_ok() { "resolved" } else { "failed" });
    result
}

async fn lookup(
    identity: &ServiceIdentity,
    resolver: &dyn TextRecordResolver,
    context: ChainContext,
) -> DiscoveryResult<Vec<String>> {
    let domain = &identity.domain;
    let record = resolver
        .resolve_text_record(domain, context, DSERVICE_KEY)
        .await?;

    let Some(resolver_address) = record.resolver else {
        return Err(DiscoveryError::NoResolver { domain: domain.clone() });
    };

    let value = match record.value {
        Some(v) if !v.is_empty() => v,
        _ => return Err(DiscoveryError::EmptyRecord { domain: domain.clone() }),
    };

    let endpoints = parse_endpoints(&value);
    if endpoints.is_empty() {
        return Err(DiscoveryError::NoEndpoints { domain: domain.clone() });
    }

    tracing::info!(
        domain = %domain,
        resolver = %resolver_address,
        endpoints = endpoints.len(),
        "Discovered dservice endpoints"
    );
    Ok(endpoints)
}
