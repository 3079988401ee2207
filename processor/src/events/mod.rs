//! Event decoders for the lending market processor
//!
//! Each decoder slices 32-byte words out of a raw queued log. Dispatch is by
//! topic0; unknown topics are surfaced so the service can discard the row.

pub mod borrow;
pub mod liquidate_borrow;
pub mod market_membership;
pub mod mint;
pub mod redeem;
pub mod repay_borrow;
pub mod transfer;

use lending_db::entity::evm_logs::EvmLogs;

use crate::{error::AppError, redis_client::channels, utils};

/// Event topics (keccak256 hashes)
pub mod topics {
    /// Mint(address minter, uint mintAmount, uint mintTokens)
    pub const MINT: &str = "0x4c209b5fc8ad50758f13e2e1088ba56a560dff690a1c6fef26394f4c03821c4f";
    /// Redeem(address redeemer, uint redeemAmount, uint redeemTokens)
    pub const REDEEM: &str = "0xe5b754fb1abb7f01b499791d0b820ae3b6af3424ac1c59768edb53f4ec31a929";
    /// Borrow(address borrower, uint borrowAmount, uint accountBorrows, uint totalBorrows)
    pub const BORROW: &str = "0x13ed6866d4e1ee6da46f845c46d7e54120883d75c5ea9a2dacc1c4ca8984ab80";
    /// RepayBorrow(address payer, address borrower, uint repayAmount, uint accountBorrows, uint totalBorrows)
    pub const REPAY_BORROW: &str =
        "0x1a2a22cb034d26d1854bdc6666a5b91fe25efbbb5dcad3b0355478d6f5c362a1";
    /// LiquidateBorrow(address liquidator, address borrower, uint repayAmount, address cTokenCollateral, uint seizeTokens)
    pub const LIQUIDATE_BORROW: &str =
        "0x298637f684da70674f26509b10f07ec2fbc77a335ab1e7d6215a4b2484d8bb52";
    /// Transfer(address indexed from, address indexed to, uint256 amount)
    pub const TRANSFER: &str =
        "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";
    /// MarketEntered(address cToken, address account)
    pub const MARKET_ENTERED: &str =
        "0x3ab23ab0d51cccc0c3085aec51f99228625aa1a922b3a8ca89a26b0f2027a1a5";
    /// MarketExited(address cToken, address account)
    pub const MARKET_EXITED: &str =
        "0xe699a64c18b07ac5ee7a922866fd37f5b4e51cb2131847d2283d3f3ba358bad1";
}

/// A decoded lending event, ready for handling and publishing
#[derive(Debug)]
pub enum LendingEvent {
    Mint(mint::MintEvent),
    Redeem(redeem::RedeemEvent),
    Borrow(borrow::BorrowEvent),
    RepayBorrow(repay_borrow::RepayBorrowEvent),
    LiquidateBorrow(liquidate_borrow::LiquidateBorrowEvent),
    Transfer(transfer::TransferEvent),
    MarketEntered(market_membership::MarketMembershipEvent),
    MarketExited(market_membership::MarketMembershipEvent),
}

impl LendingEvent {
    /// Redis channel this event is published on
    pub fn channel(&self) -> &'static str {
        match self {
            LendingEvent::Mint(_) => channels::MINT,
            LendingEvent::Redeem(_) => channels::REDEEM,
            LendingEvent::Borrow(_) => channels::BORROW,
            LendingEvent::RepayBorrow(_) => channels::REPAY_BORROW,
            LendingEvent::LiquidateBorrow(_) => channels::LIQUIDATE_BORROW,
            LendingEvent::Transfer(_) => channels::TRANSFER,
            LendingEvent::MarketEntered(_) => channels::MARKET_ENTERED,
            LendingEvent::MarketExited(_) => channels::MARKET_EXITED,
        }
    }

    /// JSON payload for the hot path
    pub fn to_payload(&self) -> Result<String, AppError> {
        let result = match self {
            LendingEvent::Mint(e) => serde_json::to_string(e),
            LendingEvent::Redeem(e) => serde_json::to_string(e),
            LendingEvent::Borrow(e) => serde_json::to_string(e),
            LendingEvent::RepayBorrow(e) => serde_json::to_string(e),
            LendingEvent::LiquidateBorrow(e) => serde_json::to_string(e),
            LendingEvent::Transfer(e) => serde_json::to_string(e),
            LendingEvent::MarketEntered(e) => serde_json::to_string(e),
            LendingEvent::MarketExited(e) => serde_json::to_string(e),
        };

        result.map_err(|e| AppError::EventDecode(e.to_string()))
    }
}

/// Decode a queued log into a typed lending event based on its topic0
pub fn decode_event(log: &EvmLogs) -> Result<LendingEvent, AppError> {
    let topic0 = utils::to_hex_string(&log.event_signature);

    match topic0.as_str() {
        topics::MINT => Ok(LendingEvent::Mint(mint::decode(log)?)),
        topics::REDEEM => Ok(LendingEvent::Redeem(redeem::decode(log)?)),
        topics::BORROW => Ok(LendingEvent::Borrow(borrow::decode(log)?)),
        topics::REPAY_BORROW => Ok(LendingEvent::RepayBorrow(repay_borrow::decode(log)?)),
        topics::LIQUIDATE_BORROW => Ok(LendingEvent::LiquidateBorrow(liquidate_borrow::decode(
            log,
        )?)),
        topics::TRANSFER => Ok(LendingEvent::Transfer(transfer::decode(log)?)),
        topics::MARKET_ENTERED => Ok(LendingEvent::MarketEntered(market_membership::decode(log)?)),
        topics::MARKET_EXITED => Ok(LendingEvent::MarketExited(market_membership::decode(log)?)),
        _ => Err(AppError::UnknownEventTopic(topic0)),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use alloy::hex::FromHex;

    /// Build a queued log row from raw parts, the way the listener would
    pub fn queued_log(topic0: &str, extra_topics: &[&str], data: Vec<u8>) -> EvmLogs {
        let mut topics = vec![Vec::from_hex(topic0.trim_start_matches("0x")).unwrap()];
        for t in extra_topics {
            topics.push(Vec::from_hex(t.trim_start_matches("0x")).unwrap());
        }

        EvmLogs {
            id: 1,
            chain_id: 1,
            address: vec![0x11; 20],
            event_signature: topics[0].clone(),
            topics,
            data,
            block_number: 19_000_000,
            block_timestamp: 1_700_000_000,
            transaction_hash: vec![0x22; 32],
            log_index: 7,
            created_at: None,
        }
    }

    /// A 32-byte word holding a right-aligned address
    pub fn address_word(byte: u8) -> Vec<u8> {
        let mut word = vec![0u8; 32];
        word[12..32].copy_from_slice(&[byte; 20]);
        word
    }

    /// A 32-byte word holding a small big-endian integer
    pub fn uint_word(value: u64) -> Vec<u8> {
        let mut word = vec![0u8; 32];
        word[24..32].copy_from_slice(&value.to_be_bytes());
        word
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn dispatches_mint_topic() {
        let data = [address_word(0xaa), uint_word(500), uint_word(25)].concat();
        let log = queued_log(topics::MINT, &[], data);

        let event = decode_event(&log).unwrap();
        assert!(matches!(event, LendingEvent::Mint(_)));
        assert_eq!(event.channel(), channels::MINT);
    }

    #[test]
    fn dispatches_membership_topics() {
        let data = [address_word(0x11), address_word(0xbb)].concat();

        let entered = decode_event(&queued_log(topics::MARKET_ENTERED, &[], data.clone())).unwrap();
        assert!(matches!(entered, LendingEvent::MarketEntered(_)));

        let exited = decode_event(&queued_log(topics::MARKET_EXITED, &[], data)).unwrap();
        assert!(matches!(exited, LendingEvent::MarketExited(_)));
        assert_eq!(exited.channel(), channels::MARKET_EXITED);
    }

    #[test]
    fn rejects_unknown_topic() {
        let log = queued_log(
            "0x0d3648bd0f6ba80134a33ba9275ac585d9d315f0ad8355cddefde31afa28d0e9",
            &[],
            vec![],
        );

        assert!(matches!(
            decode_event(&log),
            Err(AppError::UnknownEventTopic(_))
        ));
    }

    #[test]
    fn payload_is_json() {
        let data = [address_word(0xaa), uint_word(500), uint_word(25)].concat();
        let event = decode_event(&queued_log(topics::MINT, &[], data)).unwrap();

        let payload = event.to_payload().unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["minter"], format!("0x{}", "aa".repeat(20)));
    }
}
