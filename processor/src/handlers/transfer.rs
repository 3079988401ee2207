//! Transfer event handler
//!
//! Moves cToken balance between two positions. Legs where the counterparty
//! is the market contract itself are mint/redeem/seize legs already covered
//! by their own handlers, so they are skipped here.

use sqlx::types::BigDecimal;

use crate::events::transfer::TransferEvent;
use crate::utils;

use super::{common, HandlerContext, HandlerResult};

/// Process a Transfer event
///
/// 1. Skip zero-value transfers
/// 2. Sender leg (unless the sender is the market): balance decreases
/// 3. Recipient leg (unless the recipient is the market): balance increases
///
/// Both legs run through the common-stats path so each side gets a
/// transaction snapshot and a fresh accrual block number.
pub async fn handle(ctx: &HandlerContext, event: &TransferEvent) -> HandlerResult<()> {
    let market = common::get_or_create_market(&event.market, event.block_number, &ctx.db_pool).await?;

    let amount = utils::amount_to_decimal(
        &utils::hex_to_bigdecimal(&event.amount),
        market.ctoken_decimals as u32,
    );

    if amount == BigDecimal::from(0) {
        return Ok(());
    }

    let market_address = event.market.to_lowercase();

    if event.from.to_lowercase() != market_address {
        common::get_or_create_account(&event.from, &ctx.db_pool).await?;

        let mut position = common::update_common_position_stats(
            &market,
            &event.from,
            &event.tx_hash,
            event.timestamp,
            event.block_number,
            event.log_index,
            &ctx.db_pool,
        )
        .await?;

        position.ctoken_balance -= amount.clone();
        position.save(&ctx.db_pool).await?;
    }

    if event.to.to_lowercase() != market_address {
        common::get_or_create_account(&event.to, &ctx.db_pool).await?;

        let mut position = common::update_common_position_stats(
            &market,
            &event.to,
            &event.tx_hash,
            event.timestamp,
            event.block_number,
            event.log_index,
            &ctx.db_pool,
        )
        .await?;

        position.ctoken_balance += amount.clone();
        position.save(&ctx.db_pool).await?;
    }

    println!(
        "Processed Transfer: {} -> {} ({} {})",
        &event.from[..10],
        &event.to[..10],
        amount,
        market.symbol
    );

    Ok(())
}
