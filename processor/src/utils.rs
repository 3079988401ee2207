//! Hex and fixed-point helpers shared by the decoders and handlers.

use std::str::FromStr;

use alloy::primitives::U256;
use bigdecimal::num_bigint::BigInt;
use sqlx::types::BigDecimal;

/// Protocol mantissa: balances and rates are scaled by 10^18 on chain
pub const MANTISSA_FACTOR: u32 = 18;

/// Render bytes as a 0x-prefixed lowercase hex string
pub fn to_hex_string(bytes: &[u8]) -> String {
    format!("0x{}", alloy::hex::encode(bytes))
}

/// Extract the address packed into the low 20 bytes of a 32-byte word
pub fn word_to_address(word: &[u8]) -> String {
    to_hex_string(&word[12..32])
}

/// Parse a 0x-prefixed hex quantity into a BigDecimal without precision loss
pub fn hex_to_bigdecimal(hex: &str) -> BigDecimal {
    let hex_str = hex.trim_start_matches("0x");
    if hex_str.is_empty() {
        return BigDecimal::from(0);
    }

    match BigInt::parse_bytes(hex_str.as_bytes(), 16) {
        Some(val) => BigDecimal::from(val),
        None => BigDecimal::from(0),
    }
}

/// Convert a uint256 contract return value into a BigDecimal
pub fn u256_to_bigdecimal(value: U256) -> BigDecimal {
    BigDecimal::from_str(&value.to_string()).unwrap_or_else(|_| BigDecimal::from(0))
}

/// 10^decimals, built by iterative multiplication
pub fn exponent_to_big_decimal(decimals: u32) -> BigDecimal {
    let mut bd = BigDecimal::from(1);
    let ten = BigDecimal::from(10);
    for _ in 0..decimals {
        bd = bd * &ten;
    }
    bd
}

/// 10^18 as a BigDecimal
pub fn mantissa_factor_bd() -> BigDecimal {
    exponent_to_big_decimal(MANTISSA_FACTOR)
}

/// Normalize a raw integer token amount by its decimal scale
pub fn amount_to_decimal(raw: &BigDecimal, decimals: u32) -> BigDecimal {
    raw / exponent_to_big_decimal(decimals)
}

/// Unix seconds to a UTC timestamp (epoch on out-of-range input)
pub fn timestamp_to_datetime(secs: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::from_timestamp(secs, 0).unwrap_or(chrono::DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponent_zero_is_one() {
        assert_eq!(exponent_to_big_decimal(0), BigDecimal::from(1));
    }

    #[test]
    fn exponent_eighteen_is_mantissa() {
        let expected = BigDecimal::from_str("1000000000000000000").unwrap();
        assert_eq!(exponent_to_big_decimal(18), expected);
        assert_eq!(mantissa_factor_bd(), expected);
    }

    #[test]
    fn amount_normalization() {
        let raw = BigDecimal::from_str("1500000000000000000").unwrap();
        assert_eq!(
            amount_to_decimal(&raw, 18),
            BigDecimal::from_str("1.5").unwrap()
        );
    }

    #[test]
    fn hex_parse_keeps_precision_past_u128() {
        // 2^256 - 1, the largest uint256
        let hex = format!("0x{}", "ff".repeat(32));
        let expected = BigDecimal::from_str(
            "115792089237316195423570985008687907853269984665640564039457584007913129639935",
        )
        .unwrap();
        assert_eq!(hex_to_bigdecimal(&hex), expected);
    }

    #[test]
    fn hex_parse_handles_zero_and_garbage() {
        assert_eq!(hex_to_bigdecimal("0x"), BigDecimal::from(0));
        assert_eq!(hex_to_bigdecimal("0x0"), BigDecimal::from(0));
        assert_eq!(hex_to_bigdecimal("0xzz"), BigDecimal::from(0));
    }

    #[test]
    fn u256_conversion() {
        assert_eq!(u256_to_bigdecimal(U256::from(0)), BigDecimal::from(0));
        assert_eq!(
            u256_to_bigdecimal(U256::MAX),
            hex_to_bigdecimal(&format!("0x{}", "ff".repeat(32)))
        );
    }

    #[test]
    fn address_from_word() {
        let mut word = vec![0u8; 32];
        word[12..32].copy_from_slice(&[0xab; 20]);
        assert_eq!(
            word_to_address(&word),
            format!("0x{}", "ab".repeat(20))
        );
    }
}
