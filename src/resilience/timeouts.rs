//! Deadline budgeting across endpoint attempts.
//!
//! # Responsibilities
//! - Track the caller's overall deadline for one `fetch()`
//! - Hand each attempt the remaining budget, capped by the per-attempt limit
//! - Report exhaustion before an attempt starts
//!
//! Uses `tokio::time::Instant` so tests can drive it with a paused clock.

use std::time::Duration;

use tokio::time::Instant;

/// The deadline elapsed before the next attempt could start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetExhausted;

/// Time budget for one `fetch()` call.
#[derive(Debug, Clone, Copy)]
pub struct AttemptBudget {
    total: Option<Duration>,
    deadline: Option<Instant>,
    per_attempt: Option<Duration>,
}

impl AttemptBudget {
    /// Start the clock now.
    pub fn start(total: Option<Duration>, per_attempt: Option<Duration>) -> Self {
        Self {
            total,
            deadline: total.map(|t| Instant::now() + t),
            per_attempt,
        }
    }

    /// Overall budget, if bounded.
    pub fn total(&self) -> Option<Duration> {
        self.total
    }

    /// Time allowed for the next attempt; `None` means unbounded.
    pub fn next_attempt(&self) -> Result<Option<Duration>, BudgetExhausted> {
        let remaining = match self.deadline {
            Some(deadline) => {
                let left = deadline.saturating_duration_since(Instant::now());
                if left.is_zero() {
                    return Err(BudgetExhausted);
                }
                Some(left)
            }
            None => None,
        };

        Ok(match (remaining, self.per_attempt) {
            (Some(r), Some(cap)) => Some(r.min(cap)),
            (r, cap) => r.or(cap),
        })
    }

    /// True once the overall deadline has passed.
    pub fn is_exhausted(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
