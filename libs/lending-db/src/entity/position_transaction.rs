use sqlx::{types::chrono, Executor, Postgres};

/// PositionTransaction entity: an immutable per-event snapshot of when a
/// position was touched, keyed by (market, account, tx hash, log index).
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct PositionTransaction {
    pub id: i32,
    pub market_address: String,
    pub account_address: String,
    pub tx_hash: String,
    pub log_index: i64,
    pub block_number: i64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Input for recording a position transaction
#[derive(Debug, Clone)]
pub struct NewPositionTransaction {
    pub market_address: String,
    pub account_address: String,
    pub tx_hash: String,
    pub log_index: i64,
    pub block_number: i64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl PositionTransaction {
    /// Load the snapshot for a natural key, inserting it if absent.
    /// At most one row ever exists per (market, account, tx hash, log index).
    pub async fn get_or_create<'c, E>(
        tx: &NewPositionTransaction,
        connection: E,
    ) -> Result<PositionTransaction, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        let query = r#"
            INSERT INTO position_transactions (
                market_address, account_address, tx_hash, log_index, block_number, timestamp
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (market_address, account_address, tx_hash, log_index) DO UPDATE SET
                tx_hash = EXCLUDED.tx_hash
            RETURNING *
        "#;

        sqlx::query_as::<_, PositionTransaction>(query)
            .bind(&tx.market_address)
            .bind(&tx.account_address)
            .bind(&tx.tx_hash)
            .bind(tx.log_index)
            .bind(tx.block_number)
            .bind(tx.timestamp)
            .fetch_one(connection)
            .await
    }

    /// Get transaction history for a position, newest first
    pub async fn find_by_position<'c, E>(
        market_address: &str,
        account_address: &str,
        limit: i32,
        connection: E,
    ) -> Result<Vec<PositionTransaction>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, PositionTransaction>(
            r#"
            SELECT * FROM position_transactions
            WHERE market_address = $1 AND account_address = $2
            ORDER BY block_number DESC, log_index DESC
            LIMIT $3
            "#,
        )
        .bind(market_address)
        .bind(account_address)
        .bind(limit)
        .fetch_all(connection)
        .await
    }
}
