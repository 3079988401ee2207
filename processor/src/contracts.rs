//! Read-only contract calls against cToken markets.
//!
//! Every helper builds a fresh provider from RPC_URL and surfaces call
//! failures as `AppError::ContractCall`; callers decide whether a failure
//! skips the write or falls back to placeholder data.

use std::{env, str::FromStr};

use alloy::{
    primitives::{Address, U256},
    providers::ProviderBuilder,
    sol,
};

use crate::error::AppError;

sol! {
    #[sol(rpc)]
    interface CToken {
        function supplyRatePerBlock() external view returns (uint256);
        function borrowRatePerBlock() external view returns (uint256);
        function borrowIndex() external view returns (uint256);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function underlying() external view returns (address);
    }

    #[sol(rpc)]
    interface Erc20 {
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
    }
}

/// Per-block interest rates as read from the market contract
#[derive(Debug, Clone)]
pub struct MarketRates {
    pub supply_rate_per_block: U256,
    pub borrow_rate_per_block: U256,
}

/// Market metadata fetched on first sighting
#[derive(Debug, Clone)]
pub struct MarketMetadata {
    pub symbol: String,
    pub underlying_decimals: u8,
    pub ctoken_decimals: u8,
}

fn parse_address(address: &str) -> Result<Address, AppError> {
    Address::from_str(address).map_err(|_| AppError::InvalidAddress(address.to_string()))
}

fn rpc_url() -> Result<String, AppError> {
    env::var("RPC_URL").map_err(|_| AppError::MissingEnvVar("RPC_URL".into()))
}

/// Sample both per-block rates. Errors if either call reverts; the caller
/// treats that as "no snapshot for this event".
pub async fn fetch_rates(market_address: &str) -> Result<MarketRates, AppError> {
    let address = parse_address(market_address)?;
    let provider = ProviderBuilder::new()
        .on_builtin(&rpc_url()?)
        .await
        .map_err(|e| AppError::ContractCall(e.to_string()))?;

    let market = CToken::new(address, &provider);

    let supply_rate = market
        .supplyRatePerBlock()
        .call()
        .await
        .map_err(|e| AppError::ContractCall(e.to_string()))?;

    let borrow_rate = market
        .borrowRatePerBlock()
        .call()
        .await
        .map_err(|e| AppError::ContractCall(e.to_string()))?;

    Ok(MarketRates {
        supply_rate_per_block: supply_rate._0,
        borrow_rate_per_block: borrow_rate._0,
    })
}

/// Read the market's current borrow index
pub async fn fetch_borrow_index(market_address: &str) -> Result<U256, AppError> {
    let address = parse_address(market_address)?;
    let provider = ProviderBuilder::new()
        .on_builtin(&rpc_url()?)
        .await
        .map_err(|e| AppError::ContractCall(e.to_string()))?;

    let market = CToken::new(address, &provider);

    let index = market
        .borrowIndex()
        .call()
        .await
        .map_err(|e| AppError::ContractCall(e.to_string()))?;

    Ok(index._0)
}

/// Fetch symbol and decimal scales for a market. The underlying token's
/// decimals come from the underlying ERC-20; the cToken's from the market
/// contract itself.
pub async fn fetch_market_metadata(market_address: &str) -> Result<MarketMetadata, AppError> {
    let address = parse_address(market_address)?;
    let provider = ProviderBuilder::new()
        .on_builtin(&rpc_url()?)
        .await
        .map_err(|e| AppError::ContractCall(e.to_string()))?;

    let market = CToken::new(address, &provider);

    let symbol = market
        .symbol()
        .call()
        .await
        .map_err(|e| AppError::ContractCall(e.to_string()))?;

    let ctoken_decimals = market
        .decimals()
        .call()
        .await
        .map_err(|e| AppError::ContractCall(e.to_string()))?;

    let underlying = market
        .underlying()
        .call()
        .await
        .map_err(|e| AppError::ContractCall(e.to_string()))?;

    let underlying_token = Erc20::new(underlying._0, &provider);
    let underlying_decimals = underlying_token
        .decimals()
        .call()
        .await
        .map_err(|e| AppError::ContractCall(e.to_string()))?;

    Ok(MarketMetadata {
        symbol: symbol._0,
        underlying_decimals: underlying_decimals._0,
        ctoken_decimals: ctoken_decimals._0,
    })
}
