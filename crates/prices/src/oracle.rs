use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, DurationRound, Utc};
use sqlx::PgPool;

use crate::{PriceError, PriceSource};

/// Periodic ingest + historical lookup over the `token_prices` table.
#[derive(Clone)]
pub struct PriceOracle {
    pool: PgPool,
    source: Arc<dyn PriceSource>,
    /// Maximum age allowed between a requested valuation time and the quote
    /// used to answer it (spec.md §4.C's "price window").
    price_window: StdDuration,
}

impl PriceOracle {
    pub fn new(pool: PgPool, source: Arc<dyn PriceSource>, price_window: StdDuration) -> Self {
        Self { pool, source, price_window }
    }

    /// Query the source for the current price and upsert it at the current
    /// minute. Called by the ingest chore on a fixed cadence.
    pub async fn ingest_once(&self) -> Result<(), PriceError> {
        let price = self.source.latest_price().await?;
        let now = Utc::now().duration_trunc(chrono::Duration::minutes(1)).unwrap_or_else(|_| Utc::now());
        self.upsert(now, price).await
    }

    /// Return the price to use for valuing an event at `t`.
    pub async fn price_at(&self, t: DateTime<Utc>) -> Result<i64, PriceError> {
        let before = self.before(t).await?;

        if let Some((ts, price)) = before {
            if t - ts <= chrono::Duration::from_std(self.price_window).unwrap_or(chrono::Duration::zero())
            {
                return Ok(price);
            }
        }

        let (returned_ts, price) = self.source.price_at(t).await?;
        let window = chrono::Duration::from_std(self.price_window).unwrap_or(chrono::Duration::zero());
        if (t - returned_ts).abs() > window {
            return Err(PriceError::StalePrice);
        }

        let truncated = returned_ts.duration_trunc(chrono::Duration::minutes(1)).unwrap_or(returned_ts);
        self.upsert(truncated, price).await?;
        Ok(price)
    }

    /// Remove quotes older than `retain_days`. Called by the retention
    /// chore.
    pub async fn delete_before_days(&self, retain_days: i64) -> Result<u64, PriceError> {
        let cutoff = Utc::now() - chrono::Duration::days(retain_days);
        let result = sqlx::query(r#"DELETE FROM token_prices WHERE interval_start < $1"#)
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// `Before(t)`: the stored quote with the largest `interval_start < t`.
    /// Fails with [`PriceError::NoQuotes`] if the table holds nothing
    /// before `t`.
    pub async fn quote_before(&self, t: DateTime<Utc>) -> Result<(DateTime<Utc>, i64), PriceError> {
        self.before(t).await?.ok_or(PriceError::NoQuotes)
    }

    async fn before(&self, t: DateTime<Utc>) -> Result<Option<(DateTime<Utc>, i64)>, PriceError> {
        let row: Option<(DateTime<Utc>, i64)> = sqlx::query_as(
            r#"SELECT interval_start, price FROM token_prices WHERE interval_start < $1 ORDER BY interval_start DESC LIMIT 1"#,
        )
        .bind(t)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn upsert(&self, interval_start: DateTime<Utc>, price: i64) -> Result<(), PriceError> {
        sqlx::query(
            r#"
            INSERT INTO token_prices (interval_start, price)
            VALUES ($1, $2)
            ON CONFLICT (interval_start) DO UPDATE SET price = EXCLUDED.price
            "#,
        )
        .bind(interval_start)
        .bind(price)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
