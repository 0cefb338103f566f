//! Chain-specific types and error definitions.

use alloy::primitives::Address;
use thiserror::Error;

pub use crate::config::schema::EnsConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl ChainId {
    pub const MAINNET: ChainId = ChainId(1);
    pub const SEPOLIA: ChainId = ChainId(11155111);
    pub const HOLESKY: ChainId = ChainId(17000);
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur during blockchain operations.
///
/// `Clone` so a failed discovery can be handed to every waiting caller.
#[derive(Debug, Clone, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// No ENS registry is known for the chain.
    #[error("No ENS registry known for chain {0}")]
    UnsupportedChain(u64),

    /// The RPC nodes serve a different chain than the lookup targets.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Where a text lookup should be directed.
///
/// Either field may be absent; the resolver falls back to its own
/// configured chain and to the registry-reported resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainContext {
    /// Chain whose ENS registry is consulted.
    pub chain_id: Option<ChainId>,
    /// Resolver contract to query directly, skipping the registry.
    pub resolver_override: Option<Address>,
}

impl ChainContext {
    pub fn with_chain_id(mut self, chain_id: impl Into<ChainId>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }

    pub fn with_resolver(mut self, resolver: Address) -> Self {
        self.resolver_override = Some(resolver);
        self
    }
}

/// Outcome of a text-record lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecord {
    /// Resolver contract that answered, `None` when the name has no resolver.
    pub resolver: Option<Address>,
    /// Record value, `None` when absent.
    pub value: Option<String>,
}

impl TextRecord {
    /// A record for a name with no resolver registered.
    pub fn unresolved() -> Self {
        Self {
            resolver: None,
            value: None,
        }
    }
}
