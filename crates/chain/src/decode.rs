use alloy::primitives::{Address, B256, U256};
use alloy::rpc::types::Log;

use crate::{ChainError, TransferLog};

/// Decode a raw RPC log into a [`TransferLog`], validating shape.
///
/// The ERC-20 `Transfer` event has two indexed topics (`from`, `to`) after
/// the signature topic, and a single non-indexed `uint256 value` in the
/// log's data.
pub fn decode_transfer_log(chain_id: u64, log: &Log) -> Result<TransferLog, ChainError> {
    let topics = log.topics();
    if topics.len() != 3 {
        return Err(ChainError::Decode(format!(
            "expected 3 topics for Transfer log, got {}",
            topics.len()
        )));
    }

    let from = Address::from_word(topics[1]);
    let to = Address::from_word(topics[2]);

    let data = log.data().data.as_ref();
    if data.len() != 32 {
        return Err(ChainError::Decode(format!(
            "expected 32-byte value in Transfer log data, got {}",
            data.len()
        )));
    }
    let value = U256::from_be_slice(data);

    let block_hash = log.block_hash.ok_or_else(|| ChainError::Decode("missing block hash".into()))?;
    let block_number =
        log.block_number.ok_or_else(|| ChainError::Decode("missing block number".into()))?;
    let tx_hash = log.transaction_hash.unwrap_or(B256::ZERO);
    let log_index =
        log.log_index.ok_or_else(|| ChainError::Decode("missing log index".into()))?;

    Ok(TransferLog { chain_id, block_hash, block_number, tx_hash, log_index, from, to, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{b256, Bytes, LogData};

    fn sample_log(from: Address, to: Address, value: U256) -> Log {
        let sig = b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");
        let data = LogData::new(
            vec![sig, from.into_word(), to.into_word()],
            Bytes::from(value.to_be_bytes_vec()),
        )
        .unwrap();

        Log {
            inner: alloy::primitives::Log { address: Address::ZERO, data },
            block_hash: Some(B256::repeat_byte(0xAB)),
            block_number: Some(42),
            block_timestamp: None,
            transaction_hash: Some(B256::repeat_byte(0xCD)),
            transaction_index: Some(0),
            log_index: Some(3),
            removed: false,
        }
    }

    #[test]
    fn decodes_value_and_addresses() {
        let from = Address::repeat_byte(0x11);
        let to = Address::repeat_byte(0x22);
        let log = sample_log(from, to, U256::from(1_000_000u64));

        let decoded = decode_transfer_log(1337, &log).unwrap();
        assert_eq!(decoded.from, from);
        assert_eq!(decoded.to, to);
        assert_eq!(decoded.value, U256::from(1_000_000u64));
        assert_eq!(decoded.block_number, 42);
        assert_eq!(decoded.log_index, 3);
    }

    #[test]
    fn rejects_wrong_topic_count() {
        let sig = alloy::primitives::b256!(
            "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
        let data = LogData::new(vec![sig], Bytes::new()).unwrap();
        let log = Log {
            inner: alloy::primitives::Log { address: Address::ZERO, data },
            block_hash: Some(B256::ZERO),
            block_number: Some(1),
            block_timestamp: None,
            transaction_hash: None,
            transaction_index: None,
            log_index: Some(0),
            removed: false,
        };
        assert!(decode_transfer_log(1, &log).is_err());
    }
}
