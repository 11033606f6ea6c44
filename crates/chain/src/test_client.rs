//! In-memory [`ChainClient`] fixture for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use alloy::primitives::{Address, B256};
use async_trait::async_trait;

use crate::{ChainClient, ChainError, Header, TransferLog};

/// A fixture chain client fed headers and transfer logs ahead of time.
///
/// Mirrors spec.md §9's note that the scanner and payments service are
/// generic over `ChainClient` so they can be driven by a deterministic
/// fixture in tests instead of a live RPC endpoint.
#[derive(Debug, Default)]
pub struct TestChainClient {
    chain_id: u64,
    headers_by_hash: Mutex<HashMap<B256, Header>>,
    headers_by_number: Mutex<HashMap<u64, Header>>,
    tip: Mutex<Option<Header>>,
    transfers: Mutex<Vec<TransferLog>>,
    header_by_hash_calls: AtomicUsize,
}

impl TestChainClient {
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id, ..Default::default() }
    }

    /// Number of times [`ChainClient::header_by_hash`] has been called,
    /// for asserting a cache does not re-fetch on a hit.
    pub fn header_by_hash_calls(&self) -> usize {
        self.header_by_hash_calls.load(Ordering::SeqCst)
    }

    pub fn push_header(&self, header: Header) {
        self.headers_by_hash.lock().unwrap().insert(header.hash, header);
        self.headers_by_number.lock().unwrap().insert(header.number, header);
        let mut tip = self.tip.lock().unwrap();
        if tip.map(|t| header.number > t.number).unwrap_or(true) {
            *tip = Some(header);
        }
    }

    pub fn push_transfer(&self, transfer: TransferLog) {
        self.transfers.lock().unwrap().push(transfer);
    }
}

#[async_trait]
impl ChainClient for TestChainClient {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn latest_header(&self) -> Result<Header, ChainError> {
        self.tip.lock().unwrap().ok_or_else(|| ChainError::HeaderNotFound("no tip pushed".into()))
    }

    async fn header_by_hash(&self, hash: B256) -> Result<Header, ChainError> {
        self.header_by_hash_calls.fetch_add(1, Ordering::SeqCst);
        self.headers_by_hash
            .lock()
            .unwrap()
            .get(&hash)
            .copied()
            .ok_or_else(|| ChainError::HeaderNotFound(hash.to_string()))
    }

    async fn batch_headers_by_number(&self, numbers: &[u64]) -> Result<Vec<Header>, ChainError> {
        let by_number = self.headers_by_number.lock().unwrap();
        numbers
            .iter()
            .map(|n| by_number.get(n).copied().ok_or_else(|| ChainError::HeaderNotFound(n.to_string())))
            .collect()
    }

    async fn filter_transfers(
        &self,
        start: u64,
        end: Option<u64>,
        to_addrs: &[Address],
    ) -> Result<Vec<TransferLog>, ChainError> {
        let end = end.unwrap_or(u64::MAX);
        let mut matched: Vec<TransferLog> = self
            .transfers
            .lock()
            .unwrap()
            .iter()
            .filter(|t| {
                t.block_number >= start && t.block_number <= end && to_addrs.contains(&t.to)
            })
            .cloned()
            .collect();
        matched.sort_by_key(|t| (t.block_number, t.log_index));
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn filters_by_address_and_range() {
        let client = TestChainClient::new(1337);
        let a1 = Address::repeat_byte(1);
        let a2 = Address::repeat_byte(2);

        client.push_transfer(TransferLog {
            chain_id: 1337,
            block_hash: B256::repeat_byte(1),
            block_number: 5,
            tx_hash: B256::repeat_byte(9),
            log_index: 0,
            from: Address::repeat_byte(3),
            to: a1,
            value: alloy::primitives::U256::from(10u64),
        });
        client.push_transfer(TransferLog {
            chain_id: 1337,
            block_hash: B256::repeat_byte(2),
            block_number: 10,
            tx_hash: B256::repeat_byte(9),
            log_index: 0,
            from: Address::repeat_byte(3),
            to: a2,
            value: alloy::primitives::U256::from(20u64),
        });

        let result = client.filter_transfers(0, Some(6), &[a1, a2]).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].to, a1);
    }
}
