use alloy::primitives::Address;
use chrono::{DateTime, Utc};

/// A row of the wallet pool (component D).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wallet {
    pub id: i64,
    pub address: Address,
    pub satellite: String,
    pub info: Option<String>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Aggregate counts for a satellite's wallet pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    pub total: i64,
    pub claimed: i64,
    pub unclaimed: i64,
}

/// An address/info pair to insert via [`crate::WalletPool::insert_batch`].
#[derive(Debug, Clone)]
pub struct NewWallet {
    pub address: Address,
    pub info: Option<String>,
}
