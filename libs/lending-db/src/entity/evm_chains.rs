use sqlx::{Executor, Postgres};

/// EvmChains entity: registry of chains the indexer knows about
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct EvmChains {
    pub id: i64,
    pub name: String,
    pub block_time: i32,
}

impl EvmChains {
    /// Fetch a chain by its chain id
    pub async fn fetch_by_id<'c, E>(chain_id: u64, connection: E) -> Result<EvmChains, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, EvmChains>("SELECT * FROM evm_chains WHERE id = $1")
            .bind(chain_id as i64)
            .fetch_one(connection)
            .await
    }
}
