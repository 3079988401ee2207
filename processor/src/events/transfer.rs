//! Transfer event decoder
//!
//! Event signature: Transfer(address indexed from, address indexed to, uint256 amount)
//! Topic0: 0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef
//!
//! cTokens are ERC-20s, so every mint, redeem, and seize also emits a
//! Transfer with the market itself as one leg. The handler skips those legs.

use lending_db::entity::evm_logs::EvmLogs;
use serde::Serialize;

use crate::{error::AppError, utils};

/// Decoded Transfer event payload
#[derive(Debug, Serialize)]
pub struct TransferEvent {
    /// Market (cToken) contract that emitted the event
    pub market: String,
    /// Sender address
    pub from: String,
    /// Recipient address
    pub to: String,
    /// cToken amount moved (hex string to preserve precision)
    pub amount: String,
    pub block_number: i64,
    pub tx_hash: String,
    pub log_index: i64,
    pub timestamp: i64,
}

/// Decode a Transfer event from raw log data
///
/// Topics layout:
/// - topics[0]: event signature
/// - topics[1]: from (indexed)
/// - topics[2]: to (indexed)
///
/// Data layout:
/// - bytes 0-32: amount (uint256)
pub fn decode(log: &EvmLogs) -> Result<TransferEvent, AppError> {
    if log.topics.len() < 3 {
        return Err(AppError::EventDecode(format!(
            "Transfer: expected 3 topics, got {}",
            log.topics.len()
        )));
    }

    if log.data.len() < 32 {
        return Err(AppError::EventDecode(format!(
            "Transfer: expected at least 32 bytes of data, got {}",
            log.data.len()
        )));
    }

    Ok(TransferEvent {
        market: utils::to_hex_string(&log.address),
        from: utils::word_to_address(&log.topics[1]),
        to: utils::word_to_address(&log.topics[2]),
        amount: utils::to_hex_string(&log.data[0..32]),
        block_number: log.block_number,
        tx_hash: utils::to_hex_string(&log.transaction_hash),
        log_index: log.log_index,
        timestamp: log.block_timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::test_support::*;
    use crate::events::topics;

    #[test]
    fn decodes_indexed_addresses() {
        let from_topic = format!("0x{}{}", "00".repeat(12), "11".repeat(20));
        let to_topic = format!("0x{}{}", "00".repeat(12), "22".repeat(20));
        let log = queued_log(
            topics::TRANSFER,
            &[&from_topic, &to_topic],
            uint_word(777),
        );

        let event = decode(&log).unwrap();
        assert_eq!(event.from, format!("0x{}", "11".repeat(20)));
        assert_eq!(event.to, format!("0x{}", "22".repeat(20)));
        assert_eq!(utils::hex_to_bigdecimal(&event.amount).to_string(), "777");
    }

    #[test]
    fn rejects_missing_topics() {
        let log = queued_log(topics::TRANSFER, &[], uint_word(777));
        assert!(matches!(decode(&log), Err(AppError::EventDecode(_))));
    }
}
