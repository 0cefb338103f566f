//! Resilient fetch client for dservice-published backends.
//!
//! A domain publishes its backend endpoints as a newline-separated `dservice`
//! text record on ENS. [`DServiceClient`] resolves that record once, shuffles
//! the endpoints, and fails requests over across them.

pub mod blockchain;
pub mod client;
pub mod config;
pub mod discovery;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod resilience;

pub use blockchain::{ChainContext, ChainId, TextRecord, TextRecordResolver};
pub use client::{ClientOptions, DServiceClient};
pub use config::ClientConfig;
pub use discovery::{DiscoveryError, ServiceIdentity};
pub use http::{AttemptFailure, FetchError, RequestOptions};
pub use load_balancer::EndpointSet;
