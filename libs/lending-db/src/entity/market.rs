use sqlx::{
    types::{chrono, BigDecimal},
    Executor, Postgres,
};

/// Market entity representing one lending-pool (cToken) contract
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Market {
    pub id: i32,
    pub address: String,
    pub symbol: String,
    pub underlying_decimals: i16,
    pub ctoken_decimals: i16,
    pub borrow_index: Option<BigDecimal>,
    pub block_number: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub last_updated: Option<chrono::DateTime<chrono::Utc>>,
}

/// Input for creating a new market
#[derive(Debug, Clone)]
pub struct NewMarket {
    pub address: String,
    pub symbol: String,
    pub underlying_decimals: i16,
    pub ctoken_decimals: i16,
    pub block_number: i64,
}

impl Market {
    /// Create a new market record. A replay keeps the first-seen block number
    /// and refreshes metadata columns.
    pub async fn create<'c, E>(market: &NewMarket, connection: E) -> Result<Market, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        let query = r#"
            INSERT INTO markets (address, symbol, underlying_decimals, ctoken_decimals, block_number)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (address) DO UPDATE SET
                symbol = EXCLUDED.symbol,
                underlying_decimals = EXCLUDED.underlying_decimals,
                ctoken_decimals = EXCLUDED.ctoken_decimals,
                last_updated = NOW()
            RETURNING *
        "#;

        sqlx::query_as::<_, Market>(query)
            .bind(&market.address)
            .bind(&market.symbol)
            .bind(market.underlying_decimals)
            .bind(market.ctoken_decimals)
            .bind(market.block_number)
            .fetch_one(connection)
            .await
    }

    /// Find market by address
    pub async fn find_by_address<'c, E>(
        address: &str,
        connection: E,
    ) -> Result<Option<Market>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, Market>("SELECT * FROM markets WHERE address = $1")
            .bind(address)
            .fetch_optional(connection)
            .await
    }

    /// Get all tracked markets
    pub async fn find_all<'c, E>(connection: E) -> Result<Vec<Market>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, Market>("SELECT * FROM markets ORDER BY created_at ASC")
            .fetch_all(connection)
            .await
    }

    /// Update the market's last observed borrow index
    pub async fn update_borrow_index<'c, E>(
        address: &str,
        borrow_index: &BigDecimal,
        connection: E,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE markets SET
                borrow_index = $2,
                last_updated = NOW()
            WHERE address = $1
            "#,
        )
        .bind(address)
        .bind(borrow_index)
        .execute(connection)
        .await?;

        Ok(())
    }
}
