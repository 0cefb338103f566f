//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! EnsConfig (RPC URLs, chain id, resolver override)
//!     → client.rs (RPC connection with timeouts and provider failover)
//!     → ens.rs (namehash, registry → resolver → text record)
//!     → TextRecord handed to discovery
//! ```
//!
//! # Constraints
//! - Read-only: no signing, no transactions
//! - All RPC calls have configurable timeouts
//! - `TextRecordResolver` is the seam tests replace with an in-memory table

pub mod client;
pub mod ens;
pub mod types;

pub use client::BlockchainClient;
pub use ens::{namehash, EnsTextResolver, LazyEnsResolver, TextRecordResolver};
pub use types::{BlockchainError, BlockchainResult, ChainContext, ChainId, TextRecord};
