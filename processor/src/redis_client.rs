use std::env;

use redis::{aio::MultiplexedConnection, AsyncCommands, Client};

use crate::error::AppError;

/// Redis publisher for the hot path (real-time event streaming)
pub struct RedisPublisher {
    connection: MultiplexedConnection,
}

impl RedisPublisher {
    /// Create a new Redis publisher from REDIS_URL environment variable
    pub async fn new() -> Result<Self, AppError> {
        let redis_url = env::var("REDIS_URL")
            .map_err(|_| AppError::MissingEnvVar("REDIS_URL".to_string()))?;

        let client = Client::open(redis_url.as_str())
            .map_err(|e| AppError::RedisConnection(e.to_string()))?;

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::RedisConnection(e.to_string()))?;

        println!("Connected to Redis at {}", redis_url);
        Ok(Self { connection })
    }

    /// Publish a message to a Redis channel
    pub async fn publish(&mut self, channel: &str, payload: &str) -> Result<(), AppError> {
        self.connection
            .publish::<_, _, ()>(channel, payload)
            .await
            .map_err(|e| AppError::RedisPublish(e.to_string()))?;
        Ok(())
    }
}

/// Redis channels for decoded lending events
pub mod channels {
    /// Supply deposited into a market
    pub const MINT: &str = "lending:events:mint";
    /// Supply withdrawn from a market
    pub const REDEEM: &str = "lending:events:redeem";
    /// New borrow drawn against collateral
    pub const BORROW: &str = "lending:events:borrow";
    /// Borrow repaid (by the borrower or a third party)
    pub const REPAY_BORROW: &str = "lending:events:repay_borrow";
    /// Undercollateralized position liquidated
    pub const LIQUIDATE_BORROW: &str = "lending:events:liquidate_borrow";
    /// cToken balance moved between accounts
    pub const TRANSFER: &str = "lending:events:transfer";
    /// Account opted a market in as collateral
    pub const MARKET_ENTERED: &str = "lending:events:market_entered";
    /// Account opted a market out
    pub const MARKET_EXITED: &str = "lending:events:market_exited";
}
