use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use clap::Parser;
use tokenscan_chain::{AlloyChainClient, ChainClient};
use tokenscan_scanner::{AddressSource, Endpoint, ScanConfig, Scanner, ScannerError};
use tokenscan_wallets::WalletPool;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tokenscan", about = "Multi-chain STORJ payment indexer")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, env = "TOKENSCAN_CONFIG_PATH", default_value = "tokenscan.toml")]
    config: std::path::PathBuf,
}

/// Lists every claimed wallet across all satellites, the address set the
/// background scan chore watches.
struct AllClaimedWallets(WalletPool);

#[async_trait::async_trait]
impl AddressSource for AllClaimedWallets {
    async fn addresses(&self) -> Result<Vec<Address>, ScannerError> {
        self.0.list_all_claimed().await.map_err(|e| ScannerError::AddressSource(e.to_string()))
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let cli = Cli::parse();
    let config = tokenscan_config::load(&cli.config)?;

    let db = tokenscan_db::connect(&config.database_url, 10).await?;

    let mut clients: HashMap<u64, Arc<dyn ChainClient>> = HashMap::new();
    let mut endpoints = Vec::new();
    for endpoint in &config.tokens.endpoints {
        let url: url::Url = endpoint.url.parse()?;
        let contract: Address = endpoint.contract.parse()?;
        let client: Arc<dyn ChainClient> =
            Arc::new(AlloyChainClient::connect(&url, contract, endpoint.chain_id)?);
        clients.insert(endpoint.chain_id, client.clone());
        endpoints.push(Endpoint::new(endpoint.name.clone(), client));
    }

    let event_cache = tokenscan_events::EventCache::new(db.clone());
    let header_cache = tokenscan_headers::HeaderCache::new(db.clone());
    let wallet_pool = WalletPool::new(db.clone());

    let price_source: Arc<dyn tokenscan_prices::PriceSource> = if config.token_price.use_test_prices
    {
        Arc::new(tokenscan_prices::TestPriceSource)
    } else {
        let cmc = &config.token_price.coinmarketcap_config;
        Arc::new(tokenscan_prices::CoinMarketCapSource::new(tokenscan_prices::CoinMarketCapConfig {
            base_url: cmc.base_url.parse()?,
            api_key: cmc.api_key.clone(),
            timeout: Duration::from_secs(cmc.timeout_secs.max(1)),
            symbol: "STORJ".to_string(),
        })?)
    };

    let price_oracle = tokenscan_prices::PriceOracle::new(
        db.clone(),
        price_source,
        Duration::from_secs(config.token_price.price_window_secs.max(1)),
    );

    let scan_config = ScanConfig {
        block_batch_size: config.tokens.block_batch_size,
        address_batch_size: config.tokens.address_batch_size,
        maximum_query_size: config.tokens.maximum_query_size,
        chain_reorg_buffer: config.tokens.chain_reorg_buffer,
    };
    let scanner = Arc::new(Scanner::new(endpoints, event_cache.clone(), scan_config));

    let payments = tokenscan_payments::PaymentsService::new(
        event_cache,
        header_cache.clone(),
        price_oracle.clone(),
        wallet_pool.clone(),
        clients,
    );

    let api_keys = tokenscan_api::AppState::parse_keys(&config.api.keys);
    let state = tokenscan_api::AppState::new(payments, wallet_pool.clone(), db, api_keys);
    let app = tokenscan_api::app(state);

    let shutdown = CancellationToken::new();

    let scan_chore = tokio::spawn(tokenscan_scanner::run_refresh_chore(
        scanner,
        Arc::new(AllClaimedWallets(wallet_pool)),
        Duration::from_secs(config.tokens.scan_interval_secs.max(1)),
        shutdown.clone(),
    ));

    let price_chore = tokio::spawn(run_price_ingest_chore(
        price_oracle.clone(),
        Duration::from_secs(config.token_price.interval_secs.max(1)),
        shutdown.clone(),
    ));

    let price_cleanup_chore = tokio::spawn(run_price_cleanup_chore(
        price_oracle,
        config.token_price_cleanup.retain_days,
        Duration::from_secs(config.token_price_cleanup.interval_secs.max(1)),
        shutdown.clone(),
    ));

    let header_cleanup_chore = tokio::spawn(run_header_cleanup_chore(
        header_cache,
        config.header_cleanup.retain_days,
        Duration::from_secs(config.header_cleanup.interval_secs.max(1)),
        shutdown.clone(),
    ));

    let listener = tokio::net::TcpListener::bind(&config.api.address).await?;
    tracing::info!(address = %config.api.address, "listening");

    tokio::select! {
        result = axum::serve(listener, app).with_graceful_shutdown(shutdown.clone().cancelled_owned()) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received ctrl-c, shutting down");
            shutdown.cancel();
        }
    }

    shutdown.cancel();
    let _ = tokio::join!(scan_chore, price_chore, price_cleanup_chore, header_cleanup_chore);

    Ok(())
}

async fn run_price_ingest_chore(
    oracle: tokenscan_prices::PriceOracle,
    interval: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.cancelled() => return,
        }
        if let Err(err) = oracle.ingest_once().await {
            tracing::error!(error = %err, "price ingest failed, retrying next tick");
        }
    }
}

async fn run_price_cleanup_chore(
    oracle: tokenscan_prices::PriceOracle,
    retain_days: i64,
    interval: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.cancelled() => return,
        }
        match oracle.delete_before_days(retain_days).await {
            Ok(deleted) => tracing::debug!(deleted, "pruned stale price quotes"),
            Err(err) => tracing::error!(error = %err, "price cleanup failed, retrying next tick"),
        }
    }
}

async fn run_header_cleanup_chore(
    cache: tokenscan_headers::HeaderCache,
    retain_days: i64,
    interval: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.cancelled() => return,
        }
        let cutoff = chrono::Utc::now() - chrono::Duration::days(retain_days);
        match cache.delete_before(cutoff).await {
            Ok(deleted) => tracing::debug!(deleted, "pruned stale headers"),
            Err(err) => tracing::error!(error = %err, "header cleanup failed, retrying next tick"),
        }
    }
}
