use std::collections::HashMap;

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use crate::{NewWallet, PoolStats, Wallet, WalletError};

/// Ordered pool of pre-derived deposit addresses, with exactly-once
/// claiming per satellite.
#[derive(Clone)]
pub struct WalletPool {
    pool: PgPool,
}

type WalletRow = (i64, Vec<u8>, String, Option<String>, Option<DateTime<Utc>>, DateTime<Utc>);

fn row_to_wallet(row: WalletRow) -> Wallet {
    let (id, address, satellite, info, claimed_at, created_at) = row;
    Wallet { id, address: Address::from_slice(&address), satellite, info, claimed_at, created_at }
}

impl WalletPool {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Transactional best-effort bulk insert; conflicts on `address` are
    /// ignored. Returns the number of rows actually inserted.
    #[instrument(skip(self, wallets), fields(satellite, count = wallets.len()))]
    pub async fn insert_batch(
        &self,
        satellite: &str,
        wallets: &[NewWallet],
    ) -> Result<u64, WalletError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        for wallet in wallets {
            let result = sqlx::query(
                r#"
                INSERT INTO wallets (address, satellite, info)
                VALUES ($1, $2, $3)
                ON CONFLICT (address) DO NOTHING
                "#,
            )
            .bind(wallet.address.as_slice())
            .bind(satellite)
            .bind(&wallet.info)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Atomically claim the first unclaimed wallet for `satellite`, ordered
    /// by `id`. Linearizable under concurrent callers: each wallet is
    /// claimed by at most one satellite.
    #[instrument(skip(self), fields(satellite))]
    pub async fn claim(&self, satellite: &str) -> Result<Wallet, WalletError> {
        let row: Option<WalletRow> = sqlx::query_as(
            r#"
            UPDATE wallets
            SET claimed_at = now()
            WHERE id = (
                SELECT id FROM wallets
                WHERE satellite = $1 AND claimed_at IS NULL
                ORDER BY id
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, address, satellite, info, claimed_at, created_at
            "#,
        )
        .bind(satellite)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_wallet).ok_or(WalletError::NoAvailableWallets)
    }

    /// Fetch a single wallet by satellite and address.
    pub async fn get(&self, satellite: &str, address: Address) -> Result<Wallet, WalletError> {
        let row: Option<WalletRow> = sqlx::query_as(
            r#"SELECT id, address, satellite, info, claimed_at, created_at
               FROM wallets WHERE satellite = $1 AND address = $2"#,
        )
        .bind(satellite)
        .bind(address.as_slice())
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_wallet).ok_or(WalletError::NotFound)
    }

    /// All claimed wallets for a satellite, keyed by address.
    pub async fn list_claimed_by_satellite(
        &self,
        satellite: &str,
    ) -> Result<HashMap<Address, Option<String>>, WalletError> {
        let rows: Vec<(Vec<u8>, Option<String>)> = sqlx::query_as(
            r#"SELECT address, info FROM wallets WHERE satellite = $1 AND claimed_at IS NOT NULL"#,
        )
        .bind(satellite)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(addr, info)| (Address::from_slice(&addr), info)).collect())
    }

    /// Every claimed wallet across all satellites, for the scan chore's
    /// engine-wide address set.
    pub async fn list_all_claimed(&self) -> Result<Vec<Address>, WalletError> {
        let rows: Vec<(Vec<u8>,)> =
            sqlx::query_as(r#"SELECT address FROM wallets WHERE claimed_at IS NOT NULL"#)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|(addr,)| Address::from_slice(&addr)).collect())
    }

    /// Aggregate pool counts for `satellite`.
    pub async fn get_stats(&self, satellite: &str) -> Result<PoolStats, WalletError> {
        let row: (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE claimed_at IS NOT NULL),
                COUNT(*) FILTER (WHERE claimed_at IS NULL)
            FROM wallets WHERE satellite = $1
            "#,
        )
        .bind(satellite)
        .fetch_one(&self.pool)
        .await?;

        let (claimed, unclaimed) = row;
        Ok(PoolStats { total: claimed + unclaimed, claimed, unclaimed })
    }
}
