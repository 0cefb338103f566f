//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! discovery, readiness, failover produce:
//!     → tracing events (structured fields: domain, endpoint, status, fetch_id)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers (installed by the binary, never by the library):
//!     → logging.rs (tracing-subscriber with EnvFilter, stderr)
//!     → Prometheus scrape endpoint
//! ```

pub mod logging;
pub mod metrics;
