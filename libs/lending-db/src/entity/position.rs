use sqlx::{
    types::{chrono, BigDecimal},
    Executor, Postgres,
};

/// Position entity representing one account's balance state within one market.
///
/// Balances are stored normalized by the relevant token's decimal scale.
/// A row is created lazily, zeroed, on the first event touching the
/// (market, account) pair and updated in place by every later event.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Position {
    pub id: i32,
    pub market_address: String,
    pub account_address: String,
    pub symbol: String,
    pub ctoken_balance: BigDecimal,
    pub total_underlying_supplied: BigDecimal,
    pub total_underlying_redeemed: BigDecimal,
    pub total_underlying_borrowed: BigDecimal,
    pub total_underlying_repaid: BigDecimal,
    pub stored_borrow_balance: BigDecimal,
    pub account_borrow_index: BigDecimal,
    pub entered_market: bool,
    pub accrual_block_number: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub last_updated: Option<chrono::DateTime<chrono::Utc>>,
}

impl Position {
    /// Load the position for a (market, account) pair, inserting a zeroed row
    /// if none exists yet. Balance columns default to zero in the schema, so
    /// a replayed insert always lands on the same row.
    pub async fn find_or_create<'c, E>(
        market_address: &str,
        account_address: &str,
        symbol: &str,
        connection: E,
    ) -> Result<Position, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        let query = r#"
            INSERT INTO positions (market_address, account_address, symbol)
            VALUES ($1, $2, $3)
            ON CONFLICT (market_address, account_address) DO UPDATE SET
                market_address = EXCLUDED.market_address
            RETURNING *
        "#;

        sqlx::query_as::<_, Position>(query)
            .bind(market_address)
            .bind(account_address)
            .bind(symbol)
            .fetch_one(connection)
            .await
    }

    /// Find position for a (market, account) pair
    pub async fn find<'c, E>(
        market_address: &str,
        account_address: &str,
        connection: E,
    ) -> Result<Option<Position>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, Position>(
            "SELECT * FROM positions WHERE market_address = $1 AND account_address = $2",
        )
        .bind(market_address)
        .bind(account_address)
        .fetch_optional(connection)
        .await
    }

    /// Get all positions held by an account
    pub async fn find_by_account<'c, E>(
        account_address: &str,
        connection: E,
    ) -> Result<Vec<Position>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, Position>(
            "SELECT * FROM positions WHERE account_address = $1 ORDER BY market_address ASC",
        )
        .bind(account_address)
        .fetch_all(connection)
        .await
    }

    /// Persist the in-memory balance state back to the row
    pub async fn save<'c, E>(&self, connection: E) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE positions SET
                ctoken_balance = $3,
                total_underlying_supplied = $4,
                total_underlying_redeemed = $5,
                total_underlying_borrowed = $6,
                total_underlying_repaid = $7,
                stored_borrow_balance = $8,
                account_borrow_index = $9,
                entered_market = $10,
                accrual_block_number = $11,
                last_updated = NOW()
            WHERE market_address = $1 AND account_address = $2
            "#,
        )
        .bind(&self.market_address)
        .bind(&self.account_address)
        .bind(&self.ctoken_balance)
        .bind(&self.total_underlying_supplied)
        .bind(&self.total_underlying_redeemed)
        .bind(&self.total_underlying_borrowed)
        .bind(&self.total_underlying_repaid)
        .bind(&self.stored_borrow_balance)
        .bind(&self.account_borrow_index)
        .bind(self.entered_market)
        .bind(self.accrual_block_number)
        .execute(connection)
        .await?;

        Ok(())
    }
}
