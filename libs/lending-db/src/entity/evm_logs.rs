use alloy::rpc::types::Log;
use sqlx::{types::chrono, Executor, Postgres};

/// EvmLogs entity: the raw-log queue between the listener and the processor.
/// Rows are inserted by the listener and deleted by the processor once the
/// log has been handled.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct EvmLogs {
    pub id: i32,
    pub chain_id: i64,
    pub address: Vec<u8>,
    /// topic0, duplicated out of `topics` for cheap dispatch
    pub event_signature: Vec<u8>,
    pub topics: Vec<Vec<u8>>,
    pub data: Vec<u8>,
    pub block_number: i64,
    pub block_timestamp: i64,
    pub transaction_hash: Vec<u8>,
    pub log_index: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl EvmLogs {
    /// Save a raw RPC log into the queue. Refetching an overlapping block
    /// range is harmless: (tx hash, log index) collisions are ignored.
    pub async fn create<'c, E>(
        chain_id: u64,
        log: Log,
        connection: E,
    ) -> Result<Option<EvmLogs>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        let topics: Vec<Vec<u8>> = log.topics().iter().map(|t| t.to_vec()).collect();
        let event_signature = topics.first().cloned().unwrap_or_default();

        let query = r#"
            INSERT INTO evm_logs (
                chain_id, address, event_signature, topics, data,
                block_number, block_timestamp, transaction_hash, log_index
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (transaction_hash, log_index) DO NOTHING
            RETURNING *
        "#;

        sqlx::query_as::<_, EvmLogs>(query)
            .bind(chain_id as i64)
            .bind(log.address().to_vec())
            .bind(event_signature)
            .bind(topics)
            .bind(log.data().data.to_vec())
            .bind(log.block_number.unwrap_or_default() as i64)
            .bind(log.block_timestamp.unwrap_or_default() as i64)
            .bind(log.transaction_hash.map(|h| h.to_vec()).unwrap_or_default())
            .bind(log.log_index.unwrap_or_default() as i64)
            .fetch_optional(connection)
            .await
    }

    /// Fetch the next batch of queued logs in on-chain order
    pub async fn find_all<'c, E>(limit: i32, connection: E) -> Result<Vec<EvmLogs>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, EvmLogs>(
            "SELECT * FROM evm_logs ORDER BY block_number ASC, log_index ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(connection)
        .await
    }

    /// Count queued logs
    pub async fn count<'c, E>(connection: E) -> Result<i64, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM evm_logs")
            .fetch_one(connection)
            .await?;

        Ok(count)
    }

    /// Remove a handled log from the queue
    pub async fn delete<'c, E>(id: i32, connection: E) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query("DELETE FROM evm_logs WHERE id = $1")
            .bind(id)
            .execute(connection)
            .await?;

        Ok(())
    }
}
