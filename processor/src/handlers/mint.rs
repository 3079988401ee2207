//! Mint event handler
//!
//! A supply deposit: the minter hands the market underlying tokens and
//! receives freshly minted cTokens.

use crate::events::mint::MintEvent;
use crate::utils;

use super::{common, HandlerContext, HandlerResult};

/// Process a Mint event
///
/// 1. Ensure market and account rows exist
/// 2. Record the position snapshot via the common-stats path
/// 3. Grow the cToken balance and lifetime-supplied total
/// 4. Sample the market's per-block rates
pub async fn handle(ctx: &HandlerContext, event: &MintEvent) -> HandlerResult<()> {
    let market = common::get_or_create_market(&event.market, event.block_number, &ctx.db_pool).await?;
    common::get_or_create_account(&event.minter, &ctx.db_pool).await?;

    let mut position = common::update_common_position_stats(
        &market,
        &event.minter,
        &event.tx_hash,
        event.timestamp,
        event.block_number,
        event.log_index,
        &ctx.db_pool,
    )
    .await?;

    let mint_tokens = utils::amount_to_decimal(
        &utils::hex_to_bigdecimal(&event.mint_tokens),
        market.ctoken_decimals as u32,
    );
    let mint_amount = utils::amount_to_decimal(
        &utils::hex_to_bigdecimal(&event.mint_amount),
        market.underlying_decimals as u32,
    );

    position.ctoken_balance += mint_tokens;
    position.total_underlying_supplied += mint_amount.clone();
    position.save(&ctx.db_pool).await?;

    common::save_rate_per_block(&event.market, event.timestamp, &ctx.db_pool).await?;

    println!(
        "Processed Mint: {} supplied {} {} at block {}",
        &event.minter[..10],
        mint_amount,
        market.symbol,
        event.block_number
    );

    Ok(())
}
