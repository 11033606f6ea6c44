//! Payments service (component G): resolves addresses, joins cached
//! events with header timestamps and USD prices, and reports chain
//! reachability for the readiness probe.

mod error;
mod service;
mod types;

pub use error::PaymentsError;
pub use service::PaymentsService;
pub use types::{Payment, PaymentsResult, PingReport};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokenscan_chain::test_client::TestChainClient;
    use tokenscan_chain::ChainClient;

    #[tokio::test]
    async fn ping_reports_failures_for_unreachable_chains() {
        let client: Arc<dyn ChainClient> = Arc::new(TestChainClient::new(1337));
        let mut clients: HashMap<u64, Arc<dyn ChainClient>> = HashMap::new();
        clients.insert(1337, client);

        let pool = sqlx::PgPool::connect_lazy("postgres://unused/unused").unwrap();
        let service = PaymentsService::new(
            tokenscan_events::EventCache::new(pool.clone()),
            tokenscan_headers::HeaderCache::new(pool.clone()),
            tokenscan_prices::PriceOracle::new(
                pool.clone(),
                Arc::new(tokenscan_prices::TestPriceSource::default()),
                std::time::Duration::from_secs(60),
            ),
            tokenscan_wallets::WalletPool::new(pool),
            clients,
        );

        // No header was pushed to the fixture client, so latest_header errors.
        let report = service.ping().await;
        assert!(!report.is_healthy());
        assert!(report.failures.contains_key(&1337));
    }
}
