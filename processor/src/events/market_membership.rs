//! MarketEntered / MarketExited event decoder
//!
//! Both comptroller events share one layout:
//! MarketEntered(address cToken, address account) /
//! MarketExited(address cToken, address account).
//! The emitter is the comptroller, so the market comes from the data words.

use lending_db::entity::evm_logs::EvmLogs;
use serde::Serialize;

use crate::{error::AppError, utils};

/// Decoded membership event payload
#[derive(Debug, Serialize)]
pub struct MarketMembershipEvent {
    /// Market (cToken) being entered or exited
    pub market: String,
    /// Account changing its collateral membership
    pub account: String,
    pub block_number: i64,
    pub tx_hash: String,
    pub log_index: i64,
    pub timestamp: i64,
}

/// Decode a membership event from raw log data
///
/// No indexed parameters. Data layout (each 32 bytes):
/// - bytes 0-32: cToken
/// - bytes 32-64: account
pub fn decode(log: &EvmLogs) -> Result<MarketMembershipEvent, AppError> {
    if log.data.len() < 64 {
        return Err(AppError::EventDecode(format!(
            "MarketMembership: expected at least 64 bytes of data, got {}",
            log.data.len()
        )));
    }

    Ok(MarketMembershipEvent {
        market: utils::word_to_address(&log.data[0..32]),
        account: utils::word_to_address(&log.data[32..64]),
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
    fn market_comes_from_data_not_emitter() {
        let data = [address_word(0x33), address_word(0x44)].concat();
        let log = queued_log(topics::MARKET_ENTERED, &[], data);

        let event = decode(&log).unwrap();
        assert_eq!(event.market, format!("0x{}", "33".repeat(20)));
        assert_eq!(event.account, format!("0x{}", "44".repeat(20)));
    }

    #[test]
    fn rejects_short_data() {
        let log = queued_log(topics::MARKET_EXITED, &[], vec![0u8; 32]);
        assert!(matches!(decode(&log), Err(AppError::EventDecode(_))));
    }
}
