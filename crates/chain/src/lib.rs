//! Chain client abstraction: batched RPC to a single EVM JSON-RPC endpoint.
//!
//! Defines [`ChainClient`], implemented by [`AlloyChainClient`] against a
//! live `alloy` provider and by [`test_client::TestChainClient`] against an
//! in-memory fixture for tests.

mod client;
mod decode;
mod error;
mod types;

pub use client::AlloyChainClient;
pub use error::ChainError;
pub use types::{Header, TransferLog};

#[cfg(any(test, feature = "test-util"))]
pub mod test_client;

use alloy::primitives::{Address, B256};
use async_trait::async_trait;

/// The ERC-20 `Transfer(address,address,uint256)` event signature.
pub const TRANSFER_EVENT_SIGNATURE: &str = "Transfer(address,address,uint256)";

/// Batched RPC access to a single EVM-compatible chain.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The chain id this client was configured for.
    fn chain_id(&self) -> u64;

    /// The chain's current canonical tip.
    async fn latest_header(&self) -> Result<Header, ChainError>;

    /// Fetch a single header by hash.
    async fn header_by_hash(&self, hash: B256) -> Result<Header, ChainError>;

    /// Fetch multiple headers by number in a single round trip.
    async fn batch_headers_by_number(&self, numbers: &[u64]) -> Result<Vec<Header>, ChainError>;

    /// Filter the token contract's `Transfer` logs whose indexed `to` is any
    /// element of `to_addrs`, over `start..=end` (or `start..=tip` when
    /// `end` is `None`). Returned order is canonical ascending
    /// `(block_number, log_index)`.
    async fn filter_transfers(
        &self,
        start: u64,
        end: Option<u64>,
        to_addrs: &[Address],
    ) -> Result<Vec<TransferLog>, ChainError>;
}
