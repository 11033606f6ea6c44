use alloy::primitives::{Address, B256, U256};
use chrono::{DateTime, Utc};

/// A cached `Transfer` event, as returned by range/address queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEvent {
    pub chain_id: u64,
    pub block_hash: B256,
    pub block_number: u64,
    pub tx_hash: B256,
    pub log_index: u64,
    pub from_addr: Address,
    pub to_addr: Address,
    pub token_base_units: U256,
    pub created_at: DateTime<Utc>,
}
