//! Redeem event handler
//!
//! A supply withdrawal: cTokens are burned and underlying handed back.

use lending_db::entity::account::Account;

use crate::events::redeem::RedeemEvent;
use crate::utils;

use super::{common, HandlerContext, HandlerResult};

/// Process a Redeem event
///
/// 1. Ensure market and account rows exist
/// 2. Record the position snapshot via the common-stats path
/// 3. Shrink the cToken balance, grow the lifetime-redeemed total
/// 4. Bump the account's redeemer counter
/// 5. Sample the market's per-block rates
pub async fn handle(ctx: &HandlerContext, event: &RedeemEvent) -> HandlerResult<()> {
    let market = common::get_or_create_market(&event.market, event.block_number, &ctx.db_pool).await?;
    common::get_or_create_account(&event.redeemer, &ctx.db_pool).await?;

    let mut position = common::update_common_position_stats(
        &market,
        &event.redeemer,
        &event.tx_hash,
        event.timestamp,
        event.block_number,
        event.log_index,
        &ctx.db_pool,
    )
    .await?;

    let redeem_tokens = utils::amount_to_decimal(
        &utils::hex_to_bigdecimal(&event.redeem_tokens),
        market.ctoken_decimals as u32,
    );
    let redeem_amount = utils::amount_to_decimal(
        &utils::hex_to_bigdecimal(&event.redeem_amount),
        market.underlying_decimals as u32,
    );

    position.ctoken_balance -= redeem_tokens;
    position.total_underlying_redeemed += redeem_amount.clone();
    position.save(&ctx.db_pool).await?;

    Account::increment_redeemer(&event.redeemer, &ctx.db_pool).await?;

    common::save_rate_per_block(&event.market, event.timestamp, &ctx.db_pool).await?;

    println!(
        "Processed Redeem: {} withdrew {} {} at block {}",
        &event.redeemer[..10],
        redeem_amount,
        market.symbol,
        event.block_number
    );

    Ok(())
}
