use sqlx::{
    types::{chrono, BigDecimal},
    Executor, Postgres,
};

/// RatePerBlock entity: an immutable interest-rate sample for a market,
/// keyed by (market, timestamp). Rates are stored raw as read from the
/// contract (mantissa-scaled per-block values).
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct RatePerBlock {
    pub id: i32,
    pub market_address: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub supply_rate_per_block: BigDecimal,
    pub borrow_rate_per_block: BigDecimal,
}

/// Input for recording a rate sample
#[derive(Debug, Clone)]
pub struct NewRatePerBlock {
    pub market_address: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub supply_rate_per_block: BigDecimal,
    pub borrow_rate_per_block: BigDecimal,
}

impl RatePerBlock {
    /// Record a rate sample. Returns None when a sample for the
    /// (market, timestamp) key already exists; the first write wins.
    pub async fn create<'c, E>(
        rate: &NewRatePerBlock,
        connection: E,
    ) -> Result<Option<RatePerBlock>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        let query = r#"
            INSERT INTO rates_per_block (
                market_address, timestamp, supply_rate_per_block, borrow_rate_per_block
            )
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (market_address, timestamp) DO NOTHING
            RETURNING *
        "#;

        sqlx::query_as::<_, RatePerBlock>(query)
            .bind(&rate.market_address)
            .bind(rate.timestamp)
            .bind(&rate.supply_rate_per_block)
            .bind(&rate.borrow_rate_per_block)
            .fetch_optional(connection)
            .await
    }

    /// Get rate history for a market, newest first
    pub async fn find_by_market<'c, E>(
        market_address: &str,
        limit: i32,
        connection: E,
    ) -> Result<Vec<RatePerBlock>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, RatePerBlock>(
            "SELECT * FROM rates_per_block WHERE market_address = $1 ORDER BY timestamp DESC LIMIT $2",
        )
        .bind(market_address)
        .bind(limit)
        .fetch_all(connection)
        .await
    }

    /// Get the latest sample for a market
    pub async fn find_latest<'c, E>(
        market_address: &str,
        connection: E,
    ) -> Result<Option<RatePerBlock>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, RatePerBlock>(
            "SELECT * FROM rates_per_block WHERE market_address = $1 ORDER BY timestamp DESC LIMIT 1",
        )
        .bind(market_address)
        .fetch_optional(connection)
        .await
    }
}
