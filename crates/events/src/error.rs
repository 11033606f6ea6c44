/// Errors raised by [`crate::EventCache`].
#[derive(Debug, thiserror::Error)]
pub enum EventsError {
    #[error("database error: {0}")]
    Db(#[from] tokenscan_db::DbError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("token amount {0} does not fit the stored numeric scale")]
    AmountOverflow(String),
}
