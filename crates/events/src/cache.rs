use std::str::FromStr;

use alloy::primitives::{Address, B256, U256};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokenscan_chain::TransferLog;
use tracing::instrument;

use crate::{EventsError, TransferEvent};

type EventRow = (i64, Vec<u8>, i64, Vec<u8>, i32, Vec<u8>, Vec<u8>, BigDecimal, DateTime<Utc>);

fn row_to_event(row: EventRow) -> Result<TransferEvent, EventsError> {
    let (chain_id, block_hash, block_number, tx_hash, log_index, from_addr, to_addr, amount, created_at) =
        row;

    let token_base_units = U256::from_str(&amount.to_string())
        .map_err(|_| EventsError::AmountOverflow(amount.to_string()))?;

    Ok(TransferEvent {
        chain_id: chain_id as u64,
        block_hash: B256::from_slice(&block_hash),
        block_number: block_number as u64,
        tx_hash: B256::from_slice(&tx_hash),
        log_index: log_index as u64,
        from_addr: Address::from_slice(&from_addr),
        to_addr: Address::from_slice(&to_addr),
        token_base_units,
        created_at,
    })
}

fn u256_to_numeric(value: U256) -> Result<BigDecimal, EventsError> {
    BigDecimal::from_str(&value.to_string()).map_err(|_| EventsError::AmountOverflow(value.to_string()))
}

/// Persists the output of scans, keyed by `(chainId, blockHash, logIndex)`.
#[derive(Clone)]
pub struct EventCache {
    pool: PgPool,
}

impl EventCache {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bulk upsert; on conflict, overwrites the mutable columns.
    #[instrument(skip(self, events), fields(count = events.len()))]
    pub async fn insert(&self, events: &[TransferLog]) -> Result<u64, EventsError> {
        if events.is_empty() {
            return Ok(0);
        }

        tokenscan_db::check_chain_id(events[0].chain_id)?;

        let mut tx = self.pool.begin().await?;
        let mut affected = 0u64;

        for event in events {
            let amount = u256_to_numeric(event.value)?;
            let result = sqlx::query(
                r#"
                INSERT INTO transfer_events
                    (chain_id, block_hash, block_number, tx_hash, log_index, from_addr, to_addr, token_base_units)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (chain_id, block_hash, log_index) DO UPDATE SET
                    block_number = EXCLUDED.block_number,
                    tx_hash = EXCLUDED.tx_hash,
                    from_addr = EXCLUDED.from_addr,
                    to_addr = EXCLUDED.to_addr,
                    token_base_units = EXCLUDED.token_base_units
                "#,
            )
            .bind(event.chain_id as i64)
            .bind(event.block_hash.as_slice())
            .bind(event.block_number as i64)
            .bind(event.tx_hash.as_slice())
            .bind(event.log_index as i32)
            .bind(event.from.as_slice())
            .bind(event.to.as_slice())
            .bind(amount)
            .execute(&mut *tx)
            .await?;
            affected += result.rows_affected();
        }

        tx.commit().await?;
        Ok(affected)
    }

    /// Events whose `toAddr` is a claimed wallet of `satellite`, with
    /// `blockNumber >= start_block`, ordered ascending by
    /// `(blockNumber, logIndex)`.
    pub async fn get_by_satellite(
        &self,
        chain_id: u64,
        satellite: &str,
        start_block: u64,
    ) -> Result<Vec<TransferEvent>, EventsError> {
        let rows: Vec<EventRow> = sqlx::query_as(
            r#"
            SELECT e.chain_id, e.block_hash, e.block_number, e.tx_hash, e.log_index,
                   e.from_addr, e.to_addr, e.token_base_units, e.created_at
            FROM transfer_events e
            JOIN wallets w ON w.address = e.to_addr
            WHERE e.chain_id = $1
              AND w.satellite = $2
              AND w.claimed_at IS NOT NULL
              AND e.block_number >= $3
            ORDER BY e.block_number ASC, e.log_index ASC
            "#,
        )
        .bind(chain_id as i64)
        .bind(satellite)
        .bind(start_block as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_event).collect()
    }

    /// Events for a single address, with `blockNumber >= start_block`.
    pub async fn get_by_address(
        &self,
        chain_id: u64,
        to: Address,
        start_block: u64,
    ) -> Result<Vec<TransferEvent>, EventsError> {
        let rows: Vec<EventRow> = sqlx::query_as(
            r#"
            SELECT chain_id, block_hash, block_number, tx_hash, log_index,
                   from_addr, to_addr, token_base_units, created_at
            FROM transfer_events
            WHERE chain_id = $1 AND to_addr = $2 AND block_number >= $3
            ORDER BY block_number ASC, log_index ASC
            "#,
        )
        .bind(chain_id as i64)
        .bind(to.as_slice())
        .bind(start_block as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_event).collect()
    }

    /// Minimum cached `blockNumber` for `chain_id`, or 0 when empty.
    pub async fn get_oldest_cached_block_number(&self, chain_id: u64) -> Result<u64, EventsError> {
        // MIN/MAX over zero matching rows still returns one row, with NULL,
        // so the aggregate is decoded as Option<i64> rather than i64.
        let row: (Option<i64>,) =
            sqlx::query_as(r#"SELECT MIN(block_number) FROM transfer_events WHERE chain_id = $1"#)
                .bind(chain_id as i64)
                .fetch_one(&self.pool)
                .await?;
        Ok(row.0.and_then(|n| u64::try_from(n).ok()).unwrap_or(0))
    }

    /// Maximum cached `blockNumber` for `chain_id`, or 0 when empty.
    pub async fn get_latest_cached_block_number(&self, chain_id: u64) -> Result<u64, EventsError> {
        let row: (Option<i64>,) =
            sqlx::query_as(r#"SELECT MAX(block_number) FROM transfer_events WHERE chain_id = $1"#)
                .bind(chain_id as i64)
                .fetch_one(&self.pool)
                .await?;
        Ok(row.0.and_then(|n| u64::try_from(n).ok()).unwrap_or(0))
    }

    /// Reorg-handling primitive: drop events at or above `block`.
    pub async fn delete_block_and_after(
        &self,
        chain_id: u64,
        block: u64,
    ) -> Result<u64, EventsError> {
        let result = sqlx::query(
            r#"DELETE FROM transfer_events WHERE chain_id = $1 AND block_number >= $2"#,
        )
        .bind(chain_id as i64)
        .bind(block as i64)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Retention primitive: drop events below `block`. Issued explicitly
    /// by operators, not by an automatic chore (spec.md §9).
    pub async fn delete_before(&self, chain_id: u64, block: u64) -> Result<u64, EventsError> {
        let result =
            sqlx::query(r#"DELETE FROM transfer_events WHERE chain_id = $1 AND block_number < $2"#)
                .bind(chain_id as i64)
                .bind(block as i64)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}
