use tokenscan_chain::ChainError;

/// Errors raised by [`crate::HeaderCache`].
#[derive(Debug, thiserror::Error)]
pub enum HeaderCacheError {
    #[error("database error: {0}")]
    Db(#[from] tokenscan_db::DbError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("chain client error: {0}")]
    Chain(#[from] ChainError),
}
