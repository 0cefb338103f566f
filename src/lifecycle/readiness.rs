//! One-shot readiness gate.
//!
//! Requests may be issued before discovery has finished; they park here
//! until the endpoint set (or the discovery failure) is published.
//!
//! # State Transitions
//! ```text
//! Uninitialized → Initializing: first init() claims discovery
//! Initializing  → Ready:        endpoints published
//! Initializing  → Failed:       discovery error published
//! ```
//! Both `Ready` and `Failed` are terminal.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::{Notify, OnceCell};

use crate::discovery::DiscoveryError;
use crate::load_balancer::EndpointSet;

/// What every waiter observes once the gate opens.
pub type Readiness = Result<Arc<EndpointSet>, DiscoveryError>;

/// Readiness state enum.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
    Uninitialized = 0,
    Initializing = 1,
    Ready = 2,
    Failed = 3,
}

impl From<u8> for ReadinessState {
    fn from(val: u8) -> Self {
        match val {
            1 => ReadinessState::Initializing,
            2 => ReadinessState::Ready,
            3 => ReadinessState::Failed,
            _ => ReadinessState::Uninitialized,
        }
    }
}

/// Single-assignment signal carrying the discovery outcome.
#[derive(Debug)]
pub struct ReadinessGate {
    state: AtomicU8,
    outcome: OnceCell<Readiness>,
    notify: Notify,
}

impl ReadinessGate {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(ReadinessState::Uninitialized as u8),
            outcome: OnceCell::new(),
            notify: Notify::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> ReadinessState {
        ReadinessState::from(self.state.load(Ordering::Acquire))
    }

    /// Claim the right to run discovery.
    ///
    /// Returns true for exactly one caller over the gate's lifetime.
    pub fn begin(&self) -> bool {
        self.state
            .compare_exchange(
                ReadinessState::Uninitialized as u8,
                ReadinessState::Initializing as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Publish the outcome and wake every waiter.
    ///
    /// Returns false if an outcome was already published; the first one
    /// stands.
    pub fn complete(&self, outcome: Readiness) -> bool {
        let next = if outcome.is_ok() {
            ReadinessState::Ready
        } else {
            ReadinessState::Failed
        };

        if self.outcome.set(outcome).is_err() {
            tracing::warn!("Readiness already published, ignoring second outcome");
            return false;
        }

        self.state.store(next as u8, Ordering::Release);
        self.notify.notify_waiters();
        true
    }

    /// Wait for the outcome.
    pub async fn wait(&self) -> Readiness {
        loop {
            // Register before checking so a concurrent `complete` cannot
            // slip between the check and the await.
            let notified = self.notify.notified();
            if let Some(outcome) = self.outcome.get() {
                return outcome.clone();
            }
            notified.await;
        }
    }

    /// The outcome, if already published.
    pub fn try_get(&self) -> Option<Readiness> {
        self.outcome.get().cloned()
    }
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::new()
    }
}
