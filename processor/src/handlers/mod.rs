//! Event handlers for the lending market processor
//!
//! Handlers apply decoded events to the entity tables: account counters,
//! per-market positions, transaction snapshots, and rate samples.

pub mod borrow;
pub mod common;
pub mod liquidate_borrow;
pub mod market_membership;
pub mod mint;
pub mod redeem;
pub mod repay_borrow;
pub mod transfer;

use sqlx::{Pool, Postgres};

use crate::{error::AppError, events::LendingEvent};

/// Context passed to handlers
pub struct HandlerContext {
    pub db_pool: Pool<Postgres>,
}

impl HandlerContext {
    pub fn new(db_pool: Pool<Postgres>) -> Self {
        Self { db_pool }
    }
}

/// Result type for handlers
pub type HandlerResult<T> = Result<T, AppError>;

/// Route a decoded event to its handler
pub async fn dispatch(ctx: &HandlerContext, event: &LendingEvent) -> HandlerResult<()> {
    match event {
        LendingEvent::Mint(e) => mint::handle(ctx, e).await,
        LendingEvent::Redeem(e) => redeem::handle(ctx, e).await,
        LendingEvent::Borrow(e) => borrow::handle(ctx, e).await,
        LendingEvent::RepayBorrow(e) => repay_borrow::handle(ctx, e).await,
        LendingEvent::LiquidateBorrow(e) => liquidate_borrow::handle(ctx, e).await,
        LendingEvent::Transfer(e) => transfer::handle(ctx, e).await,
        LendingEvent::MarketEntered(e) => market_membership::handle(ctx, e, true).await,
        LendingEvent::MarketExited(e) => market_membership::handle(ctx, e, false).await,
    }
}
