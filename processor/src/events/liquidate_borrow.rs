//! LiquidateBorrow event decoder
//!
//! Event signature: LiquidateBorrow(address liquidator, address borrower, uint repayAmount, address cTokenCollateral, uint seizeTokens)
//! Topic0: 0x298637f684da70674f26509b10f07ec2fbc77a335ab1e7d6215a4b2484d8bb52

use lending_db::entity::evm_logs::EvmLogs;
use serde::Serialize;

use crate::{error::AppError, utils};

/// Decoded LiquidateBorrow event payload
#[derive(Debug, Serialize)]
pub struct LiquidateBorrowEvent {
    /// Borrowed market (cToken) that emitted the event
    pub market: String,
    /// Address performing the liquidation
    pub liquidator: String,
    /// Borrower being liquidated
    pub borrower: String,
    /// Underlying debt repaid by the liquidator (hex string)
    pub repay_amount: String,
    /// Collateral market whose cTokens were seized
    pub collateral_market: String,
    /// cTokens seized from the borrower (hex string)
    pub seize_tokens: String,
    pub block_number: i64,
    pub tx_hash: String,
    pub log_index: i64,
    pub timestamp: i64,
}

/// Decode a LiquidateBorrow event from raw log data
///
/// No indexed parameters. Data layout (each 32 bytes):
/// - bytes 0-32: liquidator
/// - bytes 32-64: borrower
/// - bytes 64-96: repayAmount
/// - bytes 96-128: cTokenCollateral
/// - bytes 128-160: seizeTokens
pub fn decode(log: &EvmLogs) -> Result<LiquidateBorrowEvent, AppError> {
    if log.data.len() < 160 {
        return Err(AppError::EventDecode(format!(
            "LiquidateBorrow: expected at least 160 bytes of data, got {}",
            log.data.len()
        )));
    }

    Ok(LiquidateBorrowEvent {
        market: utils::to_hex_string(&log.address),
        liquidator: utils::word_to_address(&log.data[0..32]),
        borrower: utils::word_to_address(&log.data[32..64]),
        repay_amount: utils::to_hex_string(&log.data[64..96]),
        collateral_market: utils::word_to_address(&log.data[96..128]),
        seize_tokens: utils::to_hex_string(&log.data[128..160]),
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
        let data = [
            address_word(0x0a),
            address_word(0x0b),
            uint_word(450),
            address_word(0x0c),
            uint_word(90),
        ]
        .concat();
        let log = queued_log(topics::LIQUIDATE_BORROW, &[], data);

        let event = decode(&log).unwrap();
        assert_eq!(event.liquidator, format!("0x{}", "0a".repeat(20)));
        assert_eq!(event.borrower, format!("0x{}", "0b".repeat(20)));
        assert_eq!(event.collateral_market, format!("0x{}", "0c".repeat(20)));
        assert_eq!(
            utils::hex_to_bigdecimal(&event.seize_tokens).to_string(),
            "90"
        );
    }

    #[test]
    fn rejects_short_data() {
        let log = queued_log(topics::LIQUIDATE_BORROW, &[], vec![0u8; 159]);
        assert!(matches!(decode(&log), Err(AppError::EventDecode(_))));
    }
}
