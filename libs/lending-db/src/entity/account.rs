use sqlx::{types::chrono, Executor, Postgres};

/// Account entity representing a wallet that has interacted with a lending market
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Account {
    pub id: i32,
    pub address: String,
    pub count_liquidated: i32,
    pub count_liquidator: i32,
    pub count_redeemer: i32,
    pub count_redeemed: i32,
    pub has_borrowed: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Account {
    /// Create a zeroed account record. Replaying the same address returns the
    /// existing row instead of inserting a duplicate.
    pub async fn create<'c, E>(address: &str, connection: E) -> Result<Account, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        let query = r#"
            INSERT INTO accounts (address)
            VALUES ($1)
            ON CONFLICT (address) DO UPDATE SET address = EXCLUDED.address
            RETURNING *
        "#;

        sqlx::query_as::<_, Account>(query)
            .bind(address)
            .fetch_one(connection)
            .await
    }

    /// Find account by address
    pub async fn find_by_address<'c, E>(
        address: &str,
        connection: E,
    ) -> Result<Option<Account>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE address = $1")
            .bind(address)
            .fetch_optional(connection)
            .await
    }

    /// Mark the account as having borrowed at least once
    pub async fn mark_has_borrowed<'c, E>(address: &str, connection: E) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE accounts SET has_borrowed = TRUE, updated_at = NOW() WHERE address = $1",
        )
        .bind(address)
        .execute(connection)
        .await?;

        Ok(())
    }

    /// Increment the times-liquidated counter (the account's collateral was seized)
    pub async fn increment_liquidated<'c, E>(
        address: &str,
        connection: E,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE accounts SET
                count_liquidated = count_liquidated + 1,
                updated_at = NOW()
            WHERE address = $1
            "#,
        )
        .bind(address)
        .execute(connection)
        .await?;

        Ok(())
    }

    /// Increment the liquidations-performed counter
    pub async fn increment_liquidator<'c, E>(
        address: &str,
        connection: E,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE accounts SET
                count_liquidator = count_liquidator + 1,
                updated_at = NOW()
            WHERE address = $1
            "#,
        )
        .bind(address)
        .execute(connection)
        .await?;

        Ok(())
    }

    /// Increment the redemptions-performed counter
    pub async fn increment_redeemer<'c, E>(address: &str, connection: E) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE accounts SET
                count_redeemer = count_redeemer + 1,
                updated_at = NOW()
            WHERE address = $1
            "#,
        )
        .bind(address)
        .execute(connection)
        .await?;

        Ok(())
    }

    /// Increment the redeemed-against counter (collateral redeemed by a third party)
    pub async fn increment_redeemed<'c, E>(address: &str, connection: E) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE accounts SET
                count_redeemed = count_redeemed + 1,
                updated_at = NOW()
            WHERE address = $1
            "#,
        )
        .bind(address)
        .execute(connection)
        .await?;

        Ok(())
    }

    /// Count total accounts
    pub async fn count<'c, E>(connection: E) -> Result<i64, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(connection)
            .await?;

        Ok(count)
    }
}
