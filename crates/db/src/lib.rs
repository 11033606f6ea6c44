//! Shared Postgres plumbing for the tokenscan workspace.
//!
//! Every component crate (`tokenscan-headers`, `tokenscan-events`,
//! `tokenscan-prices`, `tokenscan-wallets`) takes a [`sqlx::PgPool`] built
//! here and runs its own queries against it; this crate owns only pool
//! construction, migrations, and the error variants shared by the
//! persistence boundary.

use std::time::Duration;

use sqlx::postgres::{PgPoolOptions, PgPool};

/// Errors raised at the persistence boundary.
///
/// `InvalidChainId` is a data-integrity error per the indexer's error
/// design: it is rejected before a query is issued, not surfaced as a
/// generic database error. Address and hash lengths are enforced by
/// `alloy`'s `Address`/`B256` types at parse time, so there is no
/// corresponding variant here.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("invalid chain id: 0")]
    InvalidChainId,
}

/// Validate a chain id is non-zero, per the `block_headers`/`transfer_events`
/// data-integrity invariant.
pub fn check_chain_id(chain_id: u64) -> Result<(), DbError> {
    if chain_id == 0 {
        return Err(DbError::InvalidChainId);
    }
    Ok(())
}

/// Connect to Postgres and run pending migrations.
///
/// `max_connections` defaults to a small pool since each chore and HTTP
/// handler holds a connection only for the duration of a single query.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await?;

    sqlx::migrate!("../../migrations").run(&pool).await?;

    tracing::info!(max_connections, "connected to database and applied migrations");

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_id_zero_is_rejected() {
        assert!(matches!(check_chain_id(0), Err(DbError::InvalidChainId)));
        assert!(check_chain_id(1337).is_ok());
    }
}
