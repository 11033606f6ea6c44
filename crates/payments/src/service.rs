use std::collections::HashMap;
use std::sync::Arc;

use alloy::primitives::Address;
use tokenscan_chain::{ChainClient, Header};
use tokenscan_events::{EventCache, TransferEvent};
use tokenscan_headers::HeaderCache;
use tokenscan_prices::{usd_value_micro_usd, PriceOracle};
use tokenscan_wallets::WalletPool;
use tracing::instrument;

use crate::{Payment, PaymentsError, PaymentsResult, PingReport};

/// Component G: joins the Event cache, Header cache, and Price oracle into
/// tenant-facing payment records.
#[derive(Clone)]
pub struct PaymentsService {
    event_cache: EventCache,
    header_cache: HeaderCache,
    price_oracle: PriceOracle,
    wallet_pool: WalletPool,
    clients: Arc<HashMap<u64, Arc<dyn ChainClient>>>,
}

impl PaymentsService {
    pub fn new(
        event_cache: EventCache,
        header_cache: HeaderCache,
        price_oracle: PriceOracle,
        wallet_pool: WalletPool,
        clients: HashMap<u64, Arc<dyn ChainClient>>,
    ) -> Self {
        Self { event_cache, header_cache, price_oracle, wallet_pool, clients: Arc::new(clients) }
    }

    /// `Payments(address, fromByChain)`: transfers into a single address.
    #[instrument(skip(self, from_by_chain))]
    pub async fn payments(
        &self,
        address: Address,
        from_by_chain: &HashMap<u64, u64>,
    ) -> Result<PaymentsResult, PaymentsError> {
        let mut result = PaymentsResult::default();

        for (&chain_id, client) in self.clients.iter() {
            let start = from_by_chain.get(&chain_id).copied().unwrap_or(0);
            let events = self.event_cache.get_by_address(chain_id, address, start).await?;
            self.fold_events(client.as_ref(), events, &mut result).await?;
        }

        Ok(result)
    }

    /// `AllPayments(satellite, fromByChain)`: transfers into every wallet
    /// claimed by `satellite`.
    #[instrument(skip(self, from_by_chain))]
    pub async fn all_payments(
        &self,
        satellite: &str,
        from_by_chain: &HashMap<u64, u64>,
    ) -> Result<PaymentsResult, PaymentsError> {
        let mut result = PaymentsResult::default();

        for (&chain_id, client) in self.clients.iter() {
            let start = from_by_chain.get(&chain_id).copied().unwrap_or(0);
            let events = self.event_cache.get_by_satellite(chain_id, satellite, start).await?;
            self.fold_events(client.as_ref(), events, &mut result).await?;
        }

        Ok(result)
    }

    /// Verifies endpoint reachability for every configured chain; used by
    /// the readiness probe.
    pub async fn ping(&self) -> PingReport {
        let mut report = PingReport::default();
        for (&chain_id, client) in self.clients.iter() {
            if let Err(err) = client.latest_header().await {
                report.failures.insert(chain_id, err.to_string());
            }
        }
        report
    }

    async fn fold_events(
        &self,
        client: &dyn ChainClient,
        events: Vec<TransferEvent>,
        result: &mut PaymentsResult,
    ) -> Result<(), PaymentsError> {
        for event in events {
            let header = self.header_cache.get(client, event.block_hash).await?;
            let timestamp = chrono::DateTime::<chrono::Utc>::from_timestamp(header.timestamp as i64, 0)
                .unwrap_or(event.created_at);

            let price = self.price_oracle.price_at(timestamp).await?;
            let usd_value = usd_value_micro_usd(event.token_base_units, price).ok_or_else(|| {
                PaymentsError::ValuationOverflow(event.token_base_units.to_string())
            })?;

            result.payments.push(Payment {
                from: event.from_addr,
                to: event.to_addr,
                chain_id: event.chain_id,
                token_value: event.token_base_units,
                usd_value,
                block_hash: event.block_hash,
                block_number: event.block_number,
                tx_hash: event.tx_hash,
                log_index: event.log_index,
                timestamp,
            });

            upsert_latest(&mut result.latest_headers_by_chain, header);
        }

        Ok(())
    }
}

fn upsert_latest(map: &mut HashMap<u64, Header>, header: Header) {
    map.entry(header.chain_id)
        .and_modify(|existing| {
            if header.number > existing.number {
                *existing = header;
            }
        })
        .or_insert(header);
}
