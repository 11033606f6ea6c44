use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, DurationRound, Utc};
use serde::Deserialize;
use tracing::instrument;

use crate::{PriceError, PriceSource};

/// Configuration for the CoinMarketCap REST client.
#[derive(Debug, Clone)]
pub struct CoinMarketCapConfig {
    pub base_url: url::Url,
    pub api_key: String,
    pub timeout: Duration,
    /// The ticker symbol to quote, e.g. `"STORJ"`.
    pub symbol: String,
}

/// Production [`PriceSource`] speaking the CoinMarketCap REST protocol.
#[derive(Debug, Clone)]
pub struct CoinMarketCapSource {
    client: reqwest::Client,
    config: CoinMarketCapConfig,
}

impl CoinMarketCapSource {
    pub fn new(config: CoinMarketCapConfig) -> Result<Self, PriceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PriceError::Source(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        let url = self.config.base_url.join(path).expect("valid path joins configured base url");
        self.client.get(url).header("X-CMC_PRO_API_KEY", &self.config.api_key)
    }
}

#[derive(Debug, Deserialize)]
struct QuoteUsd {
    price: f64,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(rename = "USD")]
    usd: QuoteUsd,
}

#[derive(Debug, Deserialize)]
struct QuoteEntry {
    quote: Quote,
    #[serde(default)]
    last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    data: std::collections::HashMap<String, Vec<QuoteEntry>>,
}

#[derive(Debug, Deserialize)]
struct HistoricalResponse {
    data: HistoricalData,
}

#[derive(Debug, Deserialize)]
struct HistoricalData {
    quotes: Vec<QuoteEntry>,
}

fn to_micro_usd(price: f64) -> i64 {
    (price * 1_000_000.0).round() as i64
}

#[async_trait]
impl PriceSource for CoinMarketCapSource {
    #[instrument(skip(self))]
    async fn latest_price(&self) -> Result<i64, PriceError> {
        let resp: LatestResponse = self
            .request("v2/cryptocurrency/quotes/latest")
            .query(&[("symbol", self.config.symbol.as_str())])
            .send()
            .await
            .map_err(|e| PriceError::Source(e.to_string()))?
            .error_for_status()
            .map_err(|e| PriceError::Source(e.to_string()))?
            .json()
            .await
            .map_err(|e| PriceError::Source(e.to_string()))?;

        let entry = resp
            .data
            .get(&self.config.symbol)
            .and_then(|v| v.first())
            .ok_or_else(|| PriceError::Source("missing quote in response".into()))?;

        Ok(to_micro_usd(entry.quote.usd.price))
    }

    #[instrument(skip(self))]
    async fn price_at(&self, t: DateTime<Utc>) -> Result<(DateTime<Utc>, i64), PriceError> {
        let truncated = t.duration_trunc(chrono::Duration::minutes(1)).unwrap_or(t);

        let resp: HistoricalResponse = self
            .request("v2/cryptocurrency/quotes/historical")
            .query(&[
                ("symbol", self.config.symbol.as_str()),
                ("time_start", &truncated.to_rfc3339()),
                ("count", "1"),
            ])
            .send()
            .await
            .map_err(|e| PriceError::Source(e.to_string()))?
            .error_for_status()
            .map_err(|e| PriceError::Source(e.to_string()))?
            .json()
            .await
            .map_err(|e| PriceError::Source(e.to_string()))?;

        let entry = resp
            .data
            .quotes
            .into_iter()
            .next()
            .ok_or_else(|| PriceError::Source("missing historical quote".into()))?;

        let at = entry.timestamp.or(entry.last_updated).unwrap_or(truncated);
        Ok((at, to_micro_usd(entry.quote.usd.price)))
    }

    async fn ping(&self) -> Result<(), PriceError> {
        self.latest_price().await.map(|_| ())
    }
}
