//! RepayBorrow event decoder
//!
//! Event signature: RepayBorrow(address payer, address borrower, uint repayAmount, uint accountBorrows, uint totalBorrows)
//! Topic0: 0x1a2a22cb034d26d1854bdc6666a5b91fe25efbbb5dcad3b0355478d6f5c362a1

use lending_db::entity::evm_logs::EvmLogs;
use serde::Serialize;

use crate::{error::AppError, utils};

/// Decoded RepayBorrow event payload
#[derive(Debug, Serialize)]
pub struct RepayBorrowEvent {
    /// Market (cToken) contract that emitted the event
    pub market: String,
    /// Address paying the debt (not necessarily the borrower)
    pub payer: String,
    /// Borrower whose debt is reduced
    pub borrower: String,
    /// Underlying amount repaid (hex string)
    pub repay_amount: String,
    /// Borrower's outstanding borrow after the event (hex string)
    pub account_borrows: String,
    /// Market-wide outstanding borrows after the event (hex string)
    pub total_borrows: String,
    pub block_number: i64,
    pub tx_hash: String,
    pub log_index: i64,
    pub timestamp: i64,
}

/// Decode a RepayBorrow event from raw log data
///
/// No indexed parameters. Data layout (each 32 bytes):
/// - bytes 0-32: payer
/// - bytes 32-64: borrower
/// - bytes 64-96: repayAmount
/// - bytes 96-128: accountBorrows
/// - bytes 128-160: totalBorrows
pub fn decode(log: &EvmLogs) -> Result<RepayBorrowEvent, AppError> {
    if log.data.len() < 160 {
        return Err(AppError::EventDecode(format!(
            "RepayBorrow: expected at least 160 bytes of data, got {}",
            log.data.len()
        )));
    }

    Ok(RepayBorrowEvent {
        market: utils::to_hex_string(&log.address),
        payer: utils::word_to_address(&log.data[0..32]),
        borrower: utils::word_to_address(&log.data[32..64]),
        repay_amount: utils::to_hex_string(&log.data[64..96]),
        account_borrows: utils::to_hex_string(&log.data[96..128]),
        total_borrows: utils::to_hex_string(&log.data[128..160]),
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
            address_word(0x01),
            address_word(0x02),
            uint_word(300),
            uint_word(600),
            uint_word(39_700),
        ]
        .concat();
        let log = queued_log(topics::REPAY_BORROW, &[], data);

        let event = decode(&log).unwrap();
        assert_eq!(event.payer, format!("0x{}", "01".repeat(20)));
        assert_eq!(event.borrower, format!("0x{}", "02".repeat(20)));
        assert_eq!(
            utils::hex_to_bigdecimal(&event.repay_amount).to_string(),
            "300"
        );
        assert_eq!(
            utils::hex_to_bigdecimal(&event.account_borrows).to_string(),
            "600"
        );
    }

    #[test]
    fn rejects_short_data() {
        let log = queued_log(topics::REPAY_BORROW, &[], vec![0u8; 128]);
        assert!(matches!(decode(&log), Err(AppError::EventDecode(_))));
    }
}
