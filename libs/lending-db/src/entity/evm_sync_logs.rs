use sqlx::{types::chrono, Executor, Postgres};

/// EvmSyncLogs entity: last synced block per listener filter key
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct EvmSyncLogs {
    pub filter_key: String,
    pub chain_id: i64,
    pub last_synced_block_number: i64,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl EvmSyncLogs {
    /// Load the sync row for a filter key, creating it at block 0 if absent
    pub async fn find_or_create<'c, E>(
        filter_key: &str,
        chain_id: u64,
        connection: E,
    ) -> Result<EvmSyncLogs, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        let query = r#"
            INSERT INTO evm_sync_logs (filter_key, chain_id)
            VALUES ($1, $2)
            ON CONFLICT (filter_key) DO UPDATE SET filter_key = EXCLUDED.filter_key
            RETURNING *
        "#;

        sqlx::query_as::<_, EvmSyncLogs>(query)
            .bind(filter_key)
            .bind(chain_id as i64)
            .fetch_one(connection)
            .await
    }

    /// Advance the sync cursor for this filter
    pub async fn update_last_synced_block_number<'c, E>(
        &self,
        block_number: u64,
        connection: E,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE evm_sync_logs SET
                last_synced_block_number = $2,
                updated_at = NOW()
            WHERE filter_key = $1
            "#,
        )
        .bind(&self.filter_key)
        .bind(block_number as i64)
        .execute(connection)
        .await?;

        Ok(())
    }
}
