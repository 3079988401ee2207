//! Borrow event handler

use lending_db::entity::account::Account;

use crate::events::borrow::BorrowEvent;
use crate::utils;

use super::{common, HandlerContext, HandlerResult};

/// Process a Borrow event
///
/// 1. Ensure market and account rows exist, flag the account as a borrower
/// 2. Record the position snapshot via the common-stats path
/// 3. Overwrite the stored borrow balance with the post-event total and
///    grow the lifetime-borrowed total
/// 4. Refresh the borrow index and sample the market's per-block rates
pub async fn handle(ctx: &HandlerContext, event: &BorrowEvent) -> HandlerResult<()> {
    let market = common::get_or_create_market(&event.market, event.block_number, &ctx.db_pool).await?;
    common::get_or_create_account(&event.borrower, &ctx.db_pool).await?;
    Account::mark_has_borrowed(&event.borrower, &ctx.db_pool).await?;

    let mut position = common::update_common_position_stats(
        &market,
        &event.borrower,
        &event.tx_hash,
        event.timestamp,
        event.block_number,
        event.log_index,
        &ctx.db_pool,
    )
    .await?;

    let borrow_amount = utils::amount_to_decimal(
        &utils::hex_to_bigdecimal(&event.borrow_amount),
        market.underlying_decimals as u32,
    );
    let account_borrows = utils::amount_to_decimal(
        &utils::hex_to_bigdecimal(&event.account_borrows),
        market.underlying_decimals as u32,
    );

    position.stored_borrow_balance = account_borrows;
    position.total_underlying_borrowed += borrow_amount.clone();
    common::refresh_borrow_index(&mut position, &event.market, &ctx.db_pool).await?;
    position.save(&ctx.db_pool).await?;

    common::save_rate_per_block(&event.market, event.timestamp, &ctx.db_pool).await?;

    println!(
        "Processed Borrow: {} drew {} {} at block {}",
        &event.borrower[..10],
        borrow_amount,
        market.symbol,
        event.block_number
    );

    Ok(())
}
