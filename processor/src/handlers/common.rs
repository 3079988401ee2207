//! Shared upsert layer every event handler goes through.
//!
//! Each helper is replay-safe: loading an entity that does not exist yet
//! creates it, and re-running the same event lands on the same rows.

use lending_db::entity::{
    account::Account,
    market::{Market, NewMarket},
    position::Position,
    position_transaction::{NewPositionTransaction, PositionTransaction},
    rate_per_block::{NewRatePerBlock, RatePerBlock},
};
use sqlx::{Pool, Postgres};

use crate::{contracts, utils};

use super::HandlerResult;

/// cToken decimal scale used when market metadata cannot be fetched
const FALLBACK_CTOKEN_DECIMALS: i16 = 8;

/// Load an account, creating a zeroed one if absent
pub async fn get_or_create_account(
    address: &str,
    db_pool: &Pool<Postgres>,
) -> Result<Account, sqlx::Error> {
    match Account::find_by_address(address, db_pool).await? {
        Some(account) => Ok(account),
        None => Account::create(address, db_pool).await,
    }
}

/// Load a market, creating it on first sighting.
///
/// Metadata comes from the contract; when the calls fail the row is created
/// with placeholder metadata so event processing never stalls on RPC.
pub async fn get_or_create_market(
    address: &str,
    block_number: i64,
    db_pool: &Pool<Postgres>,
) -> HandlerResult<Market> {
    if let Some(market) = Market::find_by_address(address, db_pool).await? {
        return Ok(market);
    }

    let new_market = match contracts::fetch_market_metadata(address).await {
        Ok(metadata) => NewMarket {
            address: address.to_string(),
            symbol: metadata.symbol,
            underlying_decimals: metadata.underlying_decimals as i16,
            ctoken_decimals: metadata.ctoken_decimals as i16,
            block_number,
        },
        Err(e) => {
            println!("Market metadata fallback for {address}: {e}");
            NewMarket {
                address: address.to_string(),
                symbol: address[..10].to_string(),
                underlying_decimals: utils::MANTISSA_FACTOR as i16,
                ctoken_decimals: FALLBACK_CTOKEN_DECIMALS,
                block_number,
            }
        }
    };

    Ok(Market::create(&new_market, db_pool).await?)
}

/// Record the per-event snapshot for a position. At most one row ever
/// exists per (market, account, tx hash, log index).
pub async fn get_or_create_position_transaction(
    market_address: &str,
    account_address: &str,
    tx_hash: &str,
    timestamp: i64,
    block_number: i64,
    log_index: i64,
    db_pool: &Pool<Postgres>,
) -> Result<PositionTransaction, sqlx::Error> {
    PositionTransaction::get_or_create(
        &NewPositionTransaction {
            market_address: market_address.to_string(),
            account_address: account_address.to_string(),
            tx_hash: tx_hash.to_string(),
            log_index,
            block_number,
            timestamp: utils::timestamp_to_datetime(timestamp),
        },
        db_pool,
    )
    .await
}

/// Shared entry point for every balance-touching handler: load or create
/// the position, record the transaction snapshot, stamp the accrual block,
/// and hand the record back for the caller to apply its delta and save.
pub async fn update_common_position_stats(
    market: &Market,
    account_address: &str,
    tx_hash: &str,
    timestamp: i64,
    block_number: i64,
    log_index: i64,
    db_pool: &Pool<Postgres>,
) -> Result<Position, sqlx::Error> {
    let mut position =
        Position::find_or_create(&market.address, account_address, &market.symbol, db_pool).await?;

    get_or_create_position_transaction(
        &market.address,
        account_address,
        tx_hash,
        timestamp,
        block_number,
        log_index,
        db_pool,
    )
    .await?;

    position.accrual_block_number = block_number;

    Ok(position)
}

/// Sample both per-block rates and persist one immutable snapshot.
///
/// A reverting call skips the snapshot entirely: no retry, nothing written.
/// The host re-samples on the next event for the market anyway.
pub async fn save_rate_per_block(
    market_address: &str,
    timestamp: i64,
    db_pool: &Pool<Postgres>,
) -> Result<(), sqlx::Error> {
    let rates = match contracts::fetch_rates(market_address).await {
        Ok(rates) => rates,
        Err(e) => {
            println!("Rate snapshot skipped for {market_address}: {e}");
            return Ok(());
        }
    };

    RatePerBlock::create(
        &NewRatePerBlock {
            market_address: market_address.to_string(),
            timestamp: utils::timestamp_to_datetime(timestamp),
            supply_rate_per_block: utils::u256_to_bigdecimal(rates.supply_rate_per_block),
            borrow_rate_per_block: utils::u256_to_bigdecimal(rates.borrow_rate_per_block),
        },
        db_pool,
    )
    .await?;

    Ok(())
}

/// Refresh the position's borrow index from the contract, mirroring it onto
/// the market row. Left untouched when the call fails.
pub async fn refresh_borrow_index(
    position: &mut Position,
    market_address: &str,
    db_pool: &Pool<Postgres>,
) -> Result<(), sqlx::Error> {
    match contracts::fetch_borrow_index(market_address).await {
        Ok(index) => {
            let index_bd = utils::amount_to_decimal(
                &utils::u256_to_bigdecimal(index),
                utils::MANTISSA_FACTOR,
            );
            Market::update_borrow_index(market_address, &index_bd, db_pool).await?;
            position.account_borrow_index = index_bd;
        }
        Err(e) => {
            println!("Borrow index refresh skipped for {market_address}: {e}");
        }
    }

    Ok(())
}
