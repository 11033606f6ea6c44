/// Errors raised by [`crate::Scanner`] and its refresh chore.
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    #[error("chain {chain_id}: {source}")]
    Chain { chain_id: u64, source: tokenscan_chain::ChainError },
    #[error(transparent)]
    Events(#[from] tokenscan_events::EventsError),
    #[error("address source error: {0}")]
    AddressSource(String),
    #[error("scan pass panicked")]
    PassPanicked,
}
