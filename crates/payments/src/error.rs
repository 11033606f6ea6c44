/// Errors raised by [`crate::PaymentsService`].
#[derive(Debug, thiserror::Error)]
pub enum PaymentsError {
    #[error(transparent)]
    Events(#[from] tokenscan_events::EventsError),
    #[error(transparent)]
    Header(#[from] tokenscan_headers::HeaderCacheError),
    #[error(transparent)]
    Price(#[from] tokenscan_prices::PriceError),
    #[error(transparent)]
    Wallet(#[from] tokenscan_wallets::WalletError),
    #[error("USD value for {0} token base units does not fit an i64")]
    ValuationOverflow(String),
    #[error("no chain client configured for chain {0}")]
    UnknownChain(u64),
}
