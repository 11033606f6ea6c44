use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::PriceError;

/// An external source of STORJ/USD quotes, in micro-USD per whole token.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// The current price, as reported right now by the source.
    async fn latest_price(&self) -> Result<i64, PriceError>;

    /// The source's best estimate of the price at `t`, truncated to the
    /// minute, along with the timestamp it actually corresponds to.
    async fn price_at(&self, t: DateTime<Utc>) -> Result<(DateTime<Utc>, i64), PriceError>;

    /// Verify the source is reachable.
    async fn ping(&self) -> Result<(), PriceError>;
}

/// A fixed-price source for tests: always returns `1_000_000` micro-USD
/// (i.e. $1.00), per the testing note in spec.md §9.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestPriceSource;

pub const TEST_PRICE_MICRO_USD: i64 = 1_000_000;

#[async_trait]
impl PriceSource for TestPriceSource {
    async fn latest_price(&self) -> Result<i64, PriceError> {
        Ok(TEST_PRICE_MICRO_USD)
    }

    async fn price_at(&self, t: DateTime<Utc>) -> Result<(DateTime<Utc>, i64), PriceError> {
        Ok((t, TEST_PRICE_MICRO_USD))
    }

    async fn ping(&self) -> Result<(), PriceError> {
        Ok(())
    }
}
