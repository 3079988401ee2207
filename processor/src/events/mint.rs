//! Mint event decoder
//!
//! Event signature: Mint(address minter, uint mintAmount, uint mintTokens)
//! Topic0: 0x4c209b5fc8ad50758f13e2e1088ba56a560dff690a1c6fef26394f4c03821c4f

use lending_db::entity::evm_logs::EvmLogs;
use serde::Serialize;

use crate::{error::AppError, utils};

/// Decoded Mint event payload
#[derive(Debug, Serialize)]
pub struct MintEvent {
    /// Market (cToken) contract that emitted the event
    pub market: String,
    /// Supplier address
    pub minter: String,
    /// Underlying amount supplied (hex string to preserve precision)
    pub mint_amount: String,
    /// cTokens minted in exchange (hex string)
    pub mint_tokens: String,
    pub block_number: i64,
    pub tx_hash: String,
    pub log_index: i64,
    pub timestamp: i64,
}

/// Decode a Mint event from raw log data
///
/// No indexed parameters. Data layout (each 32 bytes):
/// - bytes 0-32: minter
/// - bytes 32-64: mintAmount
/// - bytes 64-96: mintTokens
pub fn decode(log: &EvmLogs) -> Result<MintEvent, AppError> {
    if log.data.len() < 96 {
        return Err(AppError::EventDecode(format!(
            "Mint: expected at least 96 bytes of data, got {}",
            log.data.len()
        )));
    }

    Ok(MintEvent {
        market: utils::to_hex_string(&log.address),
        minter: utils::word_to_address(&log.data[0..32]),
        mint_amount: utils::to_hex_string(&log.data[32..64]),
        mint_tokens: utils::to_hex_string(&log.data[64..96]),
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
        let data = [address_word(0xaa), uint_word(1_000), uint_word(50)].concat();
        let log = queued_log(topics::MINT, &[], data);

        let event = decode(&log).unwrap();
        assert_eq!(event.minter, format!("0x{}", "aa".repeat(20)));
        assert_eq!(utils::hex_to_bigdecimal(&event.mint_amount).to_string(), "1000");
        assert_eq!(utils::hex_to_bigdecimal(&event.mint_tokens).to_string(), "50");
        assert_eq!(event.block_number, 19_000_000);
        assert_eq!(event.log_index, 7);
    }

    #[test]
    fn rejects_short_data() {
        let log = queued_log(topics::MINT, &[], vec![0u8; 64]);
        assert!(matches!(decode(&log), Err(AppError::EventDecode(_))));
    }
}
