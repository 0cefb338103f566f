//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! DServiceClient::new  → gate created (Uninitialized)
//! DServiceClient::init → gate.begin() → discovery → shuffle → gate.complete()
//! DServiceClient::fetch → gate.wait() → failover
//! ```
//!
//! # Design Decisions
//! - Discovery runs at most once per client
//! - Failure is a terminal outcome delivered to every waiter, never a hang

pub mod readiness;

pub use readiness::{Readiness, ReadinessGate, ReadinessState};
