/// Errors raised by [`crate::WalletPool`].
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("database error: {0}")]
    Db(#[from] tokenscan_db::DbError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("no available wallets for satellite")]
    NoAvailableWallets,
    #[error("wallet not found")]
    NotFound,
}
