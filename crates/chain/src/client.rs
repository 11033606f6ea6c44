use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, B256};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::Filter;
use async_trait::async_trait;
use tracing::instrument;

use crate::decode::decode_transfer_log;
use crate::{ChainClient, ChainError, Header, TransferLog, TRANSFER_EVENT_SIGNATURE};

/// A [`ChainClient`] backed by a live `alloy` HTTP provider.
#[derive(Debug, Clone)]
pub struct AlloyChainClient {
    provider: RootProvider,
    contract: Address,
    chain_id: u64,
}

impl AlloyChainClient {
    /// Connect to `rpc_url`, scanning `contract` for the configured chain.
    pub fn connect(rpc_url: &url::Url, contract: Address, chain_id: u64) -> Result<Self, ChainError> {
        let provider = ProviderBuilder::new().connect_http(rpc_url.clone());
        Ok(Self { provider, contract, chain_id })
    }

    fn header_from_alloy(&self, header: &alloy::consensus::Header, hash: B256) -> Header {
        Header { chain_id: self.chain_id, hash, number: header.number, timestamp: header.timestamp }
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    #[instrument(skip(self), fields(chain_id = self.chain_id))]
    async fn latest_header(&self) -> Result<Header, ChainError> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?
            .ok_or_else(|| ChainError::HeaderNotFound("latest".into()))?;

        Ok(self.header_from_alloy(&block.header.inner, block.header.hash))
    }

    #[instrument(skip(self), fields(chain_id = self.chain_id))]
    async fn header_by_hash(&self, hash: B256) -> Result<Header, ChainError> {
        let block = self
            .provider
            .get_block_by_hash(hash)
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?
            .ok_or_else(|| ChainError::HeaderNotFound(hash.to_string()))?;

        Ok(self.header_from_alloy(&block.header.inner, block.header.hash))
    }

    #[instrument(skip(self, numbers), fields(chain_id = self.chain_id, count = numbers.len()))]
    async fn batch_headers_by_number(&self, numbers: &[u64]) -> Result<Vec<Header>, ChainError> {
        let mut out = Vec::with_capacity(numbers.len());
        for &number in numbers {
            let block = self
                .provider
                .get_block_by_number(BlockNumberOrTag::Number(number))
                .await
                .map_err(|e| ChainError::BatchElement(e.to_string()))?
                .ok_or_else(|| ChainError::HeaderNotFound(number.to_string()))?;
            out.push(self.header_from_alloy(&block.header.inner, block.header.hash));
        }
        Ok(out)
    }

    #[instrument(skip(self, to_addrs), fields(chain_id = self.chain_id, start, end, addrs = to_addrs.len()))]
    async fn filter_transfers(
        &self,
        start: u64,
        end: Option<u64>,
        to_addrs: &[Address],
    ) -> Result<Vec<TransferLog>, ChainError> {
        let mut filter = Filter::new()
            .address(self.contract)
            .event(TRANSFER_EVENT_SIGNATURE)
            .from_block(start);
        filter = match end {
            Some(end) => filter.to_block(end),
            None => filter.to_block(BlockNumberOrTag::Latest),
        };
        // `to` is the second indexed Transfer parameter, i.e. topic2.
        filter = filter.topic2(to_addrs.iter().map(|a| a.into_word()).collect::<Vec<_>>());

        let logs = self
            .provider
            .get_logs(&filter)
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        let mut decoded = logs
            .iter()
            .map(|log| decode_transfer_log(self.chain_id, log))
            .collect::<Result<Vec<_>, _>>()?;

        decoded.sort_by_key(|t| (t.block_number, t.log_index));
        Ok(decoded)
    }
}
