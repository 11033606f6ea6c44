/// Errors raised by the price oracle.
#[derive(Debug, thiserror::Error)]
pub enum PriceError {
    #[error("database error: {0}")]
    Db(#[from] tokenscan_db::DbError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("quote source error: {0}")]
    Source(String),
    #[error("no quotes available")]
    NoQuotes,
    #[error("retrieved price does not meet requirements")]
    StalePrice,
}
