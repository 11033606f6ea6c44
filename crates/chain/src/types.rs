use alloy::primitives::{Address, B256, U256};

/// A block header as observed from a chain's RPC endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub chain_id: u64,
    pub hash: B256,
    pub number: u64,
    pub timestamp: u64,
}

/// A decoded ERC-20 `Transfer(address,address,uint256)` log.
///
/// Ordering of a batch returned by [`crate::ChainClient::filter_transfers`]
/// is canonical ascending `(block_number, log_index)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferLog {
    pub chain_id: u64,
    pub block_hash: B256,
    pub block_number: u64,
    pub tx_hash: B256,
    pub log_index: u64,
    pub from: Address,
    pub to: Address,
    pub value: U256,
}
