//! LiquidateBorrow event handler
//!
//! Only account counters move here. The seized cTokens change hands via the
//! Transfer event the seize emits, which the transfer handler picks up.

use lending_db::entity::account::Account;

use crate::events::liquidate_borrow::LiquidateBorrowEvent;

use super::{common, HandlerContext, HandlerResult};

/// Process a LiquidateBorrow event
///
/// 1. Ensure both accounts exist
/// 2. Borrower: liquidated and redeemed-against counters go up
/// 3. Liquidator: liquidations-performed counter goes up
pub async fn handle(ctx: &HandlerContext, event: &LiquidateBorrowEvent) -> HandlerResult<()> {
    common::get_or_create_account(&event.borrower, &ctx.db_pool).await?;
    common::get_or_create_account(&event.liquidator, &ctx.db_pool).await?;

    Account::increment_liquidated(&event.borrower, &ctx.db_pool).await?;
    Account::increment_redeemed(&event.borrower, &ctx.db_pool).await?;
    Account::increment_liquidator(&event.liquidator, &ctx.db_pool).await?;

    println!(
        "Processed LiquidateBorrow: {} liquidated {} in market {} at block {}",
        &event.liquidator[..10],
        &event.borrower[..10],
        &event.market[..10],
        event.block_number
    );

    Ok(())
}
