/// Errors surfaced by a [`crate::ChainClient`].
///
/// Per the indexer's error design, the client never retries internally —
/// it surfaces the underlying cause and leaves retry policy to the caller
/// (the scanner's chore, which retries on the next tick).
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("rpc transport error: {0}")]
    Transport(String),
    #[error("header not found: {0}")]
    HeaderNotFound(String),
    #[error("log decode error: {0}")]
    Decode(String),
    #[error("batch element error: {0}")]
    BatchElement(String),
}
