use std::{env, error::Error, str::FromStr, time::Duration};

use alloy::{
    eips::BlockNumberOrTag,
    primitives::{Address, FixedBytes},
    providers::{Provider, ProviderBuilder},
    rpc::types::{Filter, Log},
};
use lending_db::entity::{evm_logs::EvmLogs, evm_sync_logs::EvmSyncLogs};
use sqlx::{Pool, Postgres};
use tokio::time::sleep;

use crate::error::AppError;

mod defaults {
    pub const RPC_DELAY_MS: &str = "1000";
    pub const MAX_RETRIES: &str = "10";
    pub const BLOCK_RANGE: u64 = 50; // conservative range for public RPCs
}

/// Event signatures (keccak256 hashes) emitted by cToken markets and the comptroller
pub mod topics {
    /// Mint(address minter, uint mintAmount, uint mintTokens)
    pub const MINT: &str = "0x4c209b5fc8ad50758f13e2e1088ba56a560dff690a1c6fef26394f4c03821c4f";
    /// Redeem(address redeemer, uint redeemAmount, uint redeemTokens)
    pub const REDEEM: &str = "0xe5b754fb1abb7f01b499791d0b820ae3b6af3424ac1c59768edb53f4ec31a929";
    /// Borrow(address borrower, uint borrowAmount, uint accountBorrows, uint totalBorrows)
    pub const BORROW: &str = "0x13ed6866d4e1ee6da46f845c46d7e54120883d75c5ea9a2dacc1c4ca8984ab80";
    /// RepayBorrow(address payer, address borrower, uint repayAmount, uint accountBorrows, uint totalBorrows)
    pub const REPAY_BORROW: &str =
        "0x1a2a22cb034d26d1854bdc6666a5b91fe25efbbb5dcad3b0355478d6f5c362a1";
    /// LiquidateBorrow(address liquidator, address borrower, uint repayAmount, address cTokenCollateral, uint seizeTokens)
    pub const LIQUIDATE_BORROW: &str =
        "0x298637f684da70674f26509b10f07ec2fbc77a335ab1e7d6215a4b2484d8bb52";
    /// Transfer(address indexed from, address indexed to, uint256 amount)
    pub const TRANSFER: &str =
        "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";
    /// MarketEntered(address cToken, address account)
    pub const MARKET_ENTERED: &str =
        "0x3ab23ab0d51cccc0c3085aec51f99228625aa1a922b3a8ca89a26b0f2027a1a5";
    /// MarketExited(address cToken, address account)
    pub const MARKET_EXITED: &str =
        "0xe699a64c18b07ac5ee7a922866fd37f5b4e51cb2131847d2283d3f3ba358bad1";

    /// All cToken market events the processor understands
    pub const MARKET_EVENTS: [&str; 6] = [
        MINT,
        REDEEM,
        BORROW,
        REPAY_BORROW,
        LIQUIDATE_BORROW,
        TRANSFER,
    ];

    /// Comptroller membership events
    pub const COMPTROLLER_EVENTS: [&str; 2] = [MARKET_ENTERED, MARKET_EXITED];
}

/// One log filter watched by the listener. Sync progress is tracked per key.
#[derive(Clone)]
pub struct WatchedFilter {
    /// Stable bookkeeping key, e.g. "markets" or "comptroller"
    pub key: String,
    /// Contract addresses to watch
    pub addresses: Vec<String>,
    /// topic0 values to match
    pub topics: Vec<String>,
}

/// Check if an error is a rate limit error
fn is_rate_limited(err: &alloy::transports::TransportError) -> bool {
    let err_str = err.to_string().to_lowercase();
    err_str.contains("429")
        || err_str.contains("rate limit")
        || err_str.contains("too many requests")
        || err_str.contains("limit exceeded")
}

/// Fetch logs with retry logic and exponential backoff
async fn fetch_logs_with_retry<P: Provider>(
    provider: &P,
    filter: &Filter,
    max_retries: u32,
    base_delay_ms: u64,
) -> Result<Vec<Log>, Box<dyn Error + Send + Sync>> {
    for attempt in 0..max_retries {
        match provider.get_logs(filter).await {
            Ok(logs) => {
                // Delay after a successful call to stay under public RPC limits
                sleep(Duration::from_millis(base_delay_ms)).await;
                return Ok(logs);
            }
            Err(e) => {
                if is_rate_limited(&e) {
                    let backoff_ms = base_delay_ms * (2_u64.pow(attempt));
                    eprintln!(
                        "Rate limited (attempt {}/{}), backing off for {}ms",
                        attempt + 1,
                        max_retries,
                        backoff_ms
                    );
                    sleep(Duration::from_millis(backoff_ms)).await;
                } else {
                    return Err(Box::new(e));
                }
            }
        }
    }

    Err(Box::new(AppError::MaxRetriesExceeded(max_retries)))
}

/// Build an address + topic0 filter over a bounded block range
fn build_filter(
    watched: &WatchedFilter,
    from_block: u64,
    to_block: u64,
) -> Result<Filter, Box<dyn Error + Send + Sync>> {
    let mut addresses = Vec::with_capacity(watched.addresses.len());
    for address in &watched.addresses {
        addresses.push(
            Address::from_str(address)
                .map_err(|_| AppError::InvalidAddress(address.clone()))?,
        );
    }

    let mut topic_hashes = Vec::with_capacity(watched.topics.len());
    for topic in &watched.topics {
        topic_hashes.push(FixedBytes::<32>::from_str(topic)?);
    }

    Ok(Filter::new()
        .from_block(BlockNumberOrTag::Number(from_block))
        .to_block(BlockNumberOrTag::Number(to_block))
        .address(addresses)
        .event_signature(topic_hashes))
}

pub async fn fetch_and_save_logs(
    chain_id: u64,
    db_pool: Pool<Postgres>,
    watched: WatchedFilter,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let rpc_url = env::var("RPC_URL").map_err(|_| AppError::MissingEnvVar("RPC_URL".into()))?;

    let rpc_delay_ms = env::var("RPC_DELAY_MS")
        .unwrap_or_else(|_| defaults::RPC_DELAY_MS.to_string())
        .parse::<u64>()
        .unwrap_or(1000);

    let max_retries = env::var("MAX_RETRIES")
        .unwrap_or_else(|_| defaults::MAX_RETRIES.to_string())
        .parse::<u32>()
        .unwrap_or(3);

    let provider = ProviderBuilder::new().on_builtin(&rpc_url).await?;

    let sync_log = EvmSyncLogs::find_or_create(&watched.key, chain_id, &db_pool).await?;

    let latest_block = provider.get_block_number().await?;

    if latest_block == sync_log.last_synced_block_number as u64 {
        println!("Fully indexed: {}", watched.key);
        return Ok(());
    }

    let from_block_number = match sync_log.last_synced_block_number as u64 {
        0 => {
            // Start from a recent block to avoid a massive backfill
            latest_block.saturating_sub(defaults::BLOCK_RANGE)
        }
        block_number => block_number + 1_u64,
    };

    let to_block_number = std::cmp::min(from_block_number + defaults::BLOCK_RANGE, latest_block);

    let filter = build_filter(&watched, from_block_number, to_block_number)?;

    let logs = fetch_logs_with_retry(&provider, &filter, max_retries, rpc_delay_ms).await?;

    let log_count = logs.len();
    let mut tx = db_pool.begin().await?;

    for log in logs {
        let _ = EvmLogs::create(chain_id, log, &mut *tx)
            .await
            .inspect_err(|error| eprintln!("Error saving log: {error}"));
    }

    let _ = sync_log
        .update_last_synced_block_number(to_block_number, &mut *tx)
        .await
        .inspect_err(|error| eprintln!("Error updating last_synced_block_number: {error}"));

    match tx.commit().await {
        Ok(_) => {
            println!(
                "Saved {log_count} logs for {}, blocks: {from_block_number} to {to_block_number}",
                watched.key
            );
        }
        Err(err) => eprintln!("Transaction commit error: {err}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_filter_rejects_bad_address() {
        let watched = WatchedFilter {
            key: "markets".into(),
            addresses: vec!["not-an-address".into()],
            topics: vec![topics::MINT.into()],
        };

        assert!(build_filter(&watched, 1, 2).is_err());
    }

    #[test]
    fn build_filter_accepts_market_set() {
        let watched = WatchedFilter {
            key: "markets".into(),
            addresses: vec!["0x4Ddc2D193948926D02f9B1fE9e1daa0718270ED5".into()],
            topics: topics::MARKET_EVENTS.iter().map(|t| t.to_string()).collect(),
        };

        assert!(build_filter(&watched, 100, 150).is_ok());
    }
}
