//! Load spreading subsystem.
//!
//! # Data Flow
//! ```text
//! discovered endpoints (publication order)
//!     → endpoint_set.rs (shuffle once)
//!     → Arc<EndpointSet> shared by every fetch
//! ```
//!
//! # Design Decisions
//! - Replicas are equally trusted: no weights, no priority, no per-call
//!   reordering
//! - No health tracking; failover handles a dead replica per call

pub mod endpoint_set;

pub use endpoint_set::EndpointSet;
