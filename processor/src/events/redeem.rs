//! Redeem event decoder
//!
//! Event signature: Redeem(address redeemer, uint redeemAmount, uint redeemTokens)
//! Topic0: 0xe5b754fb1abb7f01b499791d0b820ae3b6af3424ac1c59768edb53f4ec31a929

use lending_db::entity::evm_logs::EvmLogs;
use serde::Serialize;

use crate::{error::AppError, utils};

/// Decoded Redeem event payload
#[derive(Debug, Serialize)]
pub struct RedeemEvent {
    /// Market (cToken) contract that emitted the event
    pub market: String,
    /// Withdrawing address
    pub redeemer: String,
    /// Underlying amount withdrawn (hex string)
    pub redeem_amount: String,
    /// cTokens burned (hex string)
    pub redeem_tokens: String,
    pub block_number: i64,
    pub tx_hash: String,
    pub log_index: i64,
    pub timestamp: i64,
}

/// Decode a Redeem event from raw log data
///
/// No indexed parameters. Data layout (each 32 bytes):
/// - bytes 0-32: redeemer
/// - bytes 32-64: redeemAmount
/// - bytes 64-96: redeemTokens
pub fn decode(log: &EvmLogs) -> Result<RedeemEvent, AppError> {
    if log.data.len() < 96 {
        return Err(AppError::EventDecode(format!(
            "Redeem: expected at least 96 bytes of data, got {}",
            log.data.len()
        )));
    }

    Ok(RedeemEvent {
        market: utils::to_hex_string(&log.address),
        redeemer: utils::word_to_address(&log.data[0..32]),
        redeem_amount: utils::to_hex_string(&log.data[32..64]),
        redeem_tokens: utils::to_hex_string(&log.data[64..96]),
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
    fn decodes_fields_from_words() {
        let data = [address_word(0xbc), uint_word(2_500), uint_word(120)].concat();
        let log = queued_log(topics::REDEEM, &[], data);

        let event = decode(&log).unwrap();
        assert_eq!(event.redeemer, format!("0x{}", "bc".repeat(20)));
        assert_eq!(
            utils::hex_to_bigdecimal(&event.redeem_amount).to_string(),
            "2500"
        );
        assert_eq!(
            utils::hex_to_bigdecimal(&event.redeem_tokens).to_string(),
            "120"
        );
    }

    #[test]
    fn rejects_short_data() {
        let log = queued_log(topics::REDEEM, &[], vec![0u8; 32]);
        assert!(matches!(decode(&log), Err(AppError::EventDecode(_))));
    }
}
