use std::{env, time::Duration};

use error::AppError;
use lending_db::{entity::evm_chains::EvmChains, initialize_database};
use service::{fetch_and_save_logs, topics, WatchedFilter};
use tokio::time::sleep;

mod error;
mod service;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Starting Lending Market Listener...");

    let db_pool = initialize_database().await?;

    let chain_id_env =
        env::var("CHAIN_ID").map_err(|_| AppError::MissingEnvVar("CHAIN_ID".into()))?;
    let chain_id = chain_id_env
        .parse::<u64>()
        .map_err(|_| AppError::InvalidChainID(chain_id_env))?;

    let evm_chain = EvmChains::fetch_by_id(chain_id, &db_pool).await?;
    println!("Connected to chain: {} (ID: {})", evm_chain.name, chain_id);

    // cToken market addresses, comma separated
    let markets_env =
        env::var("MARKETS").map_err(|_| AppError::MissingEnvVar("MARKETS".into()))?;
    let market_addresses: Vec<String> = markets_env
        .split(',')
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();

    let comptroller =
        env::var("COMPTROLLER").map_err(|_| AppError::MissingEnvVar("COMPTROLLER".into()))?;

    let mut filters = vec![WatchedFilter {
        key: "markets".to_string(),
        addresses: market_addresses.clone(),
        topics: topics::MARKET_EVENTS.iter().map(|t| t.to_string()).collect(),
    }];

    filters.push(WatchedFilter {
        key: "comptroller".to_string(),
        addresses: vec![comptroller],
        topics: topics::COMPTROLLER_EVENTS
            .iter()
            .map(|t| t.to_string())
            .collect(),
    });

    let poll_delay = Duration::from_secs(evm_chain.block_time as u64);

    println!(
        "Indexing lending events from {} markets and the comptroller...",
        market_addresses.len()
    );

    loop {
        for filter in &filters {
            match fetch_and_save_logs(chain_id, db_pool.clone(), filter.clone()).await {
                Ok(()) => {}
                Err(err) => {
                    eprintln!("Indexing error: {:?}", err);
                }
            }
        }
        sleep(poll_delay).await;
    }
}
