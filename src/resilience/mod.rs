//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! fetch(path, options) against a ready EndpointSet:
//!     → timeouts.rs (remaining deadline, per-attempt cap)
//!     → failover.rs (one attempt at a time, in set order)
//!     → policy.rs (success / client error / transient)
//! ```
//!
//! # Design Decisions
//! - No retries against the same endpoint; failover is the only retry
//! - No backoff between endpoints: the next replica is independent
//! - Client errors end the call; transient errors advance it

pub mod failover;
pub mod policy;
pub mod timeouts;

pub use failover::FailoverFetcher;
pub use policy::{classify, AttemptOutcome};
pub use timeouts::AttemptBudget;
