//! Token price oracle (component C): periodic ingest of a STORJ/USD quote
//! and historical lookup with bounded staleness.

mod coinmarketcap;
mod error;
mod money;
mod oracle;
mod source;

pub use coinmarketcap::{CoinMarketCapConfig, CoinMarketCapSource};
pub use error::PriceError;
pub use money::{usd_value, usd_value_micro_usd, TOKEN_DECIMALS, USD_DECIMALS};
pub use oracle::PriceOracle;
pub use source::{PriceSource, TestPriceSource, TEST_PRICE_MICRO_USD};
