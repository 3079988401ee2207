//! Borrow event decoder
//!
//! Event signature: Borrow(address borrower, uint borrowAmount, uint accountBorrows, uint totalBorrows)
//! Topic0: 0x13ed6866d4e1ee6da46f845c46d7e54120883d75c5ea9a2dacc1c4ca8984ab80

use lending_db::entity::evm_logs::EvmLogs;
use serde::Serialize;

use crate::{error::AppError, utils};

/// Decoded Borrow event payload
#[derive(Debug, Serialize)]
pub struct BorrowEvent {
    /// Market (cToken) contract that emitted the event
    pub market: String,
    /// Borrowing address
    pub borrower: String,
    /// Underlying amount drawn in this event (hex string)
    pub borrow_amount: String,
    /// Borrower's total outstanding borrow after the event (hex string)
    pub account_borrows: String,
    /// Market-wide outstanding borrows after the event (hex string)
    pub total_borrows: String,
    pub block_number: i64,
    pub tx_hash: String,
    pub log_index: i64,
    pub timestamp: i64,
}

/// Decode a Borrow event from raw log data
///
/// No indexed parameters. Data layout (each 32 bytes):
/// - bytes 0-32: borrower
/// - bytes 32-64: borrowAmount
/// - bytes 64-96: accountBorrows
/// - bytes 96-128: totalBorrows
pub fn decode(log: &EvmLogs) -> Result<BorrowEvent, AppError> {
    if log.data.len() < 128 {
        return Err(AppError::EventDecode(format!(
            "Borrow: expected at least 128 bytes of data, got {}",
            log.data.len()
        )));
    }

    Ok(BorrowEvent {
        market: utils::to_hex_string(&log.address),
        borrower: utils::word_to_address(&log.data[0..32]),
        borrow_amount: utils::to_hex_string(&log.data[32..64]),
        account_borrows: utils::to_hex_string(&log.data[64..96]),
        total_borrows: utils::to_hex_string(&log.data[96..128]),
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
            address_word(0xcd),
            uint_word(700),
            uint_word(900),
            uint_word(40_000),
        ]
        .concat();
        let log = queued_log(topics::BORROW, &[], data);

        let event = decode(&log).unwrap();
        assert_eq!(event.borrower, format!("0x{}", "cd".repeat(20)));
        assert_eq!(
            utils::hex_to_bigdecimal(&event.borrow_amount).to_string(),
            "700"
        );
        assert_eq!(
            utils::hex_to_bigdecimal(&event.account_borrows).to_string(),
            "900"
        );
        assert_eq!(
            utils::hex_to_bigdecimal(&event.total_borrows).to_string(),
            "40000"
        );
    }

    #[test]
    fn rejects_short_data() {
        let log = queued_log(topics::BORROW, &[], vec![0u8; 96]);
        assert!(matches!(decode(&log), Err(AppError::EventDecode(_))));
    }
}
