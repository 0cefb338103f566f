//! Finalized endpoint set.
//!
//! # Responsibilities
//! - Shuffle discovered endpoints exactly once to spread load
//! - Hold the resulting order immutably for the client's lifetime

use rand::seq::SliceRandom;
use rand::Rng;

/// Ordered, immutable list of endpoint base URLs.
///
/// Every `fetch()` walks this list from index 0, so the shuffle decides
/// which replica takes first contact for the whole process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSet {
    endpoints: Box<[String]>,
}

impl EndpointSet {
    /// Shuffle with the thread-local RNG.
    pub fn shuffled(endpoints: Vec<String>) -> Self {
        Self::shuffled_with(endpoints, &mut rand::thread_rng())
    }

    /// Shuffle with a caller-supplied RNG.
    pub fn shuffled_with<R: Rng + ?Sized>(mut endpoints: Vec<String>, rng: &mut R) -> Self {
        endpoints.shuffle(rng);
        Self {
            endpoints: endpoints.into_boxed_slice(),
        }
    }

    /// Keep the given order.
    pub fn in_order(endpoints: Vec<String>) -> Self {
        Self {
            endpoints: endpoints.into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.endpoints.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.endpoints
    }
}
