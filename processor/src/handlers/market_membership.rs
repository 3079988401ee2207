//! MarketEntered / MarketExited event handler
//!
//! Comptroller membership toggles whether a position counts as collateral.

use crate::events::market_membership::MarketMembershipEvent;

use super::{common, HandlerContext, HandlerResult};

/// Process a membership event, setting the position's entered-market flag
pub async fn handle(
    ctx: &HandlerContext,
    event: &MarketMembershipEvent,
    entered: bool,
) -> HandlerResult<()> {
    let market = common::get_or_create_market(&event.market, event.block_number, &ctx.db_pool).await?;
    common::get_or_create_account(&event.account, &ctx.db_pool).await?;

    let mut position = common::update_common_position_stats(
        &market,
        &event.account,
        &event.tx_hash,
        event.timestamp,
        event.block_number,
        event.log_index,
        &ctx.db_pool,
    )
    .await?;

    position.entered_market = entered;
    position.save(&ctx.db_pool).await?;

    println!(
        "Processed {}: {} in market {}",
        if entered { "MarketEntered" } else { "MarketExited" },
        &event.account[..10],
        market.symbol
    );

    Ok(())
}
