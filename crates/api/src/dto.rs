use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokenscan_chain::Header;
use tokenscan_payments::{Payment, PaymentsResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDto {
    pub from: String,
    pub to: String,
    pub chain_id: u64,
    pub token_value: String,
    pub usd_value: i64,
    pub block_hash: String,
    pub block_number: u64,
    pub tx_hash: String,
    pub log_index: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl From<&Payment> for PaymentDto {
    fn from(p: &Payment) -> Self {
        Self {
            from: p.from.to_string(),
            to: p.to.to_string(),
            chain_id: p.chain_id,
            token_value: p.token_value.to_string(),
            usd_value: p.usd_value,
            block_hash: p.block_hash.to_string(),
            block_number: p.block_number,
            tx_hash: p.tx_hash.to_string(),
            log_index: p.log_index,
            timestamp: p.timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderDto {
    pub number: u64,
    pub hash: String,
    pub timestamp: u64,
}

impl From<&Header> for HeaderDto {
    fn from(h: &Header) -> Self {
        Self { number: h.number, hash: h.hash.to_string(), timestamp: h.timestamp }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentsResponse {
    pub latest_blocks: HashMap<String, HeaderDto>,
    pub payments: Vec<PaymentDto>,
}

impl From<&PaymentsResult> for PaymentsResponse {
    fn from(r: &PaymentsResult) -> Self {
        Self {
            latest_blocks: r
                .latest_headers_by_chain
                .iter()
                .map(|(chain_id, header)| (chain_id.to_string(), header.into()))
                .collect(),
            payments: r.payments.iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewWalletDto {
    pub address: String,
    #[serde(default)]
    pub info: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    #[serde(rename = "ID")]
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct InsertedResponse {
    pub inserted: u64,
}
