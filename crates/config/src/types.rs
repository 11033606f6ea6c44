use serde::Deserialize;

/// One configured chain endpoint (`Tokens.Endpoints`).
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub name: String,
    pub url: String,
    pub contract: String,
    pub chain_id: u64,
}

/// Scan batching and lookback tunables (`Tokens.*`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TokensConfig {
    pub endpoints: Vec<EndpointConfig>,
    pub address_batch_size: usize,
    pub block_batch_size: u64,
    pub chain_reorg_buffer: u64,
    pub maximum_query_size: u64,
    /// Cadence of the scan refresh chore. Not named in spec.md's
    /// configuration surface (which documents batching and retention
    /// knobs but not this chore's own tick rate); defaulted here the way
    /// the other chores' `Interval` options are.
    pub scan_interval_secs: u64,
}

impl Default for TokensConfig {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            address_batch_size: 100,
            block_batch_size: 5_000,
            chain_reorg_buffer: 15,
            maximum_query_size: 10_000,
            scan_interval_secs: 15,
        }
    }
}

/// `CoinmarketcapConfig`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CoinmarketcapConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

/// `TokenPrice.*`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TokenPriceConfig {
    pub interval_secs: u64,
    pub price_window_secs: u64,
    pub use_test_prices: bool,
    pub coinmarketcap_config: CoinmarketcapConfig,
}

impl Default for TokenPriceConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            price_window_secs: 60,
            use_test_prices: false,
            coinmarketcap_config: CoinmarketcapConfig::default(),
        }
    }
}

/// A `{Interval, RetainDays}` retention chore's config, shared shape for
/// `TokenPriceCleanup` and `HeaderCleanup`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    pub interval_secs: u64,
    pub retain_days: i64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        // 336h == 14 days, spec.md's default cleanup cadence.
        Self { interval_secs: 336 * 3600, retain_days: 30 }
    }
}

/// `API.*`: HTTP listen address and `satellite:secret` key pairs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub address: String,
    pub keys: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { address: "0.0.0.0:8080".to_string(), keys: Vec::new() }
    }
}

/// Top-level configuration, as loaded from a TOML file and overridden by
/// `TOKENSCAN_`-prefixed environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_url: String,
    pub tokens: TokensConfig,
    pub token_price: TokenPriceConfig,
    pub token_price_cleanup: CleanupConfig,
    pub header_cleanup: CleanupConfig,
    pub api: ApiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            tokens: TokensConfig::default(),
            token_price: TokenPriceConfig::default(),
            token_price_cleanup: CleanupConfig::default(),
            header_cleanup: CleanupConfig::default(),
            api: ApiConfig::default(),
        }
    }
}
