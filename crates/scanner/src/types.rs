use std::sync::Arc;

use tokenscan_chain::ChainClient;

/// Scan tunables, defaulting to the values an operator would otherwise set
/// under `Tokens.*` in the engine's configuration.
#[derive(Debug, Clone, Copy)]
pub struct ScanConfig {
    pub block_batch_size: u64,
    pub address_batch_size: usize,
    pub maximum_query_size: u64,
    pub chain_reorg_buffer: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            block_batch_size: 5_000,
            address_batch_size: 100,
            maximum_query_size: 10_000,
            chain_reorg_buffer: 15,
        }
    }
}

/// A single configured chain endpoint.
#[derive(Clone)]
pub struct Endpoint {
    pub chain_id: u64,
    pub name: String,
    pub client: Arc<dyn ChainClient>,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, client: Arc<dyn ChainClient>) -> Self {
        let chain_id = client.chain_id();
        Self { chain_id, name: name.into(), client }
    }
}
