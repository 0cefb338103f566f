//! ENS text-record lookup.
//!
//! # Data Flow
//! ```text
//! domain ──namehash──▶ node
//!   eth_chainId (once) ── must equal the target chain
//!   resolver override? ──yes──▶ resolver
//!                      └─no──▶ registry(chain_id).resolver(node) ──▶ resolver
//!   resolver.text(node, key) ──▶ TextRecord
//! ```
//!
//! The target chain is the context's chain id, or the configured one. A
//! lookup against nodes serving another chain fails with `ChainMismatch`
//! instead of silently reading that chain's records.
//!
//! Names are lower-cased before hashing. Full ENSIP-15 normalization is not
//! performed, so names with non-ASCII labels must be passed pre-normalized.

use alloy::primitives::{address, keccak256, Address, B256};
use alloy::sol;
use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ChainContext, ChainId, EnsConfig, TextRecord,
};

sol! {
    #[sol(rpc)]
    interface EnsRegistry {
        function resolver(bytes32 node) external view returns (address);
    }

    #[sol(rpc)]
    interface TextResolver {
        function text(bytes32 node, string calldata key) external view returns (string memory);
    }
}

/// ENS registry, deployed at the same address on every supported network.
pub const ENS_REGISTRY: Address = address!("00000000000C2E074eC69A0dFb2997BA6C7d2e1e");

/// Registry address for a chain, if ENS is deployed there.
pub fn registry_address(chain_id: ChainId) -> Option<Address> {
    match chain_id {
        ChainId::MAINNET | ChainId::SEPOLIA | ChainId::HOLESKY => Some(ENS_REGISTRY),
        _ => None,
    }
}

/// EIP-137 namehash of a dotted name.
pub fn namehash(name: &str) -> B256 {
    let name = name.trim().trim_end_matches('.').to_lowercase();
    let mut node = B256::ZERO;
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit('.') {
        let label_hash = keccak256(label.as_bytes());
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(label_hash.as_slice());
        node = keccak256(buf);
    }
    node
}

/// Looks up a text record attached to a blockchain domain.
///
/// Implementations must be side-effect free. Whatever error they return is
/// passed through discovery unchanged.
#[async_trait]
pub trait TextRecordResolver: Send + Sync {
    async fn resolve_text_record(
        &self,
        domain: &str,
        context: ChainContext,
        key: &str,
    ) -> BlockchainResult<TextRecord>;
}

/// On-chain resolver backed by ENS contracts.
#[derive(Debug, Clone)]
pub struct EnsTextResolver {
    client: BlockchainClient,
    /// Chain reported by the nodes, fetched on first lookup.
    connected_chain: OnceCell<ChainId>,
}

impl EnsTextResolver {
    pub fn new(client: BlockchainClient) -> Self {
        Self {
            client,
            connected_chain: OnceCell::new(),
        }
    }

    async fn ensure_chain(&self, expected: ChainId) -> BlockchainResult<()> {
        let actual = *self
            .connected_chain
            .get_or_try_init(|| self.client.get_chain_id())
            .await?;
        if actual != expected {
            tracing::warn!(expected = %expected, actual = %actual, "RPC nodes serve a different chain");
            return Err(BlockchainError::ChainMismatch {
                expected: expected.0,
                actual: actual.0,
            });
        }
        Ok(())
    }

    async fn resolver_for(&self, node: B256, context: ChainContext) -> BlockchainResult<Option<Address>> {
        let chain_id = context.chain_id.unwrap_or_else(|| self.client.chain_id());

        if let Some(resolver) = context.resolver_override {
            self.ensure_chain(chain_id).await?;
            return Ok(Some(resolver));
        }

        let registry = registry_address(chain_id).ok_or(BlockchainError::UnsupportedChain(chain_id.0))?;
        self.ensure_chain(chain_id).await?;

        let resolver = self
            .client
            .call("ens.resolver", |p| async move {
                EnsRegistry::new(registry, p).resolver(node).call().await
            })
            .await?;

        Ok((resolver != Address::ZERO).then_some(resolver))
    }
}

#[async_trait]
impl TextRecordResolver for EnsTextResolver {
    async fn resolve_text_record(
        &self,
        domain: &str,
        context: ChainContext,
        key: &str,
    ) -> BlockchainResult<TextRecord> {
        let node = namehash(domain);

        let Some(resolver) = self.resolver_for(node, context).await? else {
            tracing::debug!(domain = %domain, "No resolver registered");
            return Ok(TextRecord::unresolved());
        };

        let value = self
            .client
            .call("ens.text", |p| {
                let key = key.to_string();
                async move { TextResolver::new(resolver, p).text(node, key).call().await }
            })
            .await?;

        tracing::debug!(domain = %domain, resolver = %resolver, key = %key, "Text record resolved");

        Ok(TextRecord {
            resolver: Some(resolver),
            value: (!value.is_empty()).then_some(value),
        })
    }
}

/// ENS resolver whose RPC client is built on first lookup.
///
/// A client with a static endpoint never consults discovery, so an unusable
/// RPC URL only fails the lookups that actually need it.
#[derive(Debug)]
pub struct LazyEnsResolver {
    config: EnsConfig,
    inner: OnceCell<EnsTextResolver>,
}

impl LazyEnsResolver {
    pub fn new(config: EnsConfig) -> Self {
        Self {
            config,
            inner: OnceCell::new(),
        }
    }

    /// Whether the RPC client has been built.
    pub fn is_connected(&self) -> bool {
        self.inner.initialized()
    }

    async fn resolver(&self) -> BlockchainResult<&EnsTextResolver> {
        self.inner
            .get_or_try_init(|| async { BlockchainClient::new(self.config.clone()).map(EnsTextResolver::new) })
            .await
    }
}

#[async_trait]
impl TextRecordResolver for LazyEnsResolver {
    async fn resolve_text_record(
        &self,
        domain: &str,
        context: ChainContext,
        key: &str,
    ) -> BlockchainResult<TextRecord> {
        self.resolver().await?.resolve_text_record(domain, context, key).await
    }
}
