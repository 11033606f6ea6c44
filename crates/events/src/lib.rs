//! Event cache (component E): persists decoded `Transfer` logs and serves
//! the range/address queries the payments service needs.

mod cache;
mod error;
mod types;

pub use cache::EventCache;
pub use error::EventsError;
pub use types::TransferEvent;

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, b256, U256};
    use tokenscan_chain::TransferLog;

    fn sample_log(block_number: u64, log_index: u64) -> TransferLog {
        TransferLog {
            chain_id: 1,
            block_hash: b256!("111111111111111111111111111111111111111111111111111111111111111a"),
            block_number,
            tx_hash: b256!("222222222222222222222222222222222222222222222222222222222222222b"),
            log_index,
            from: address!("0000000000000000000000000000000000dead"),
            to: address!("000000000000000000000000000000000000ab"),
            value: U256::from(10_000u64),
        }
    }

    #[test]
    fn sample_log_round_trips_through_value_conversion() {
        let log = sample_log(100, 0);
        let as_str = log.value.to_string();
        assert_eq!(as_str, "10000");
    }
}
