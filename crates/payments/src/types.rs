use alloy::primitives::{Address, B256, U256};
use chrono::{DateTime, Utc};
use tokenscan_chain::Header;

/// A single valued transfer into a claimed deposit wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub from: Address,
    pub to: Address,
    pub chain_id: u64,
    pub token_value: U256,
    pub usd_value: i64,
    pub block_hash: B256,
    pub block_number: u64,
    pub tx_hash: B256,
    pub log_index: u64,
    pub timestamp: DateTime<Utc>,
}

/// Result of [`crate::PaymentsService::payments`] or `all_payments`.
#[derive(Debug, Clone, Default)]
pub struct PaymentsResult {
    pub latest_headers_by_chain: std::collections::HashMap<u64, Header>,
    pub payments: Vec<Payment>,
}

/// Result of [`crate::PaymentsService::ping`]: per-chain reachability.
#[derive(Debug, Clone, Default)]
pub struct PingReport {
    pub failures: std::collections::HashMap<u64, String>,
}

impl PingReport {
    pub fn is_healthy(&self) -> bool {
        self.failures.is_empty()
    }
}
