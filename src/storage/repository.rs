use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

use crate::domain::{
    Cents, NewSeller, NewTransaction, PaymentType, Seller, SellerId, SellerIncome, Transaction,
    TransactionId,
};

use super::MIGRATION_001_INITIAL;

const SELLER_COLUMNS: &str = "id, name, contact_info, registration_date";
const TRANSACTION_COLUMNS: &str = "id, seller_id, amount_cents, payment_type, transaction_date";

/// Repository for persisting and querying sellers and their transactions.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to an existing SQLite database.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = Self::options(database_url)?;
        Self::connect_with(options).await
    }

    /// Initialize a database (create if missing + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let options = Self::options(database_url)?.create_if_missing(true);
        let repo = Self::connect_with(options).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    fn options(database_url: &str) -> Result<SqliteConnectOptions> {
        Ok(SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {database_url}"))?
            .foreign_keys(true))
    }

    async fn connect_with(options: SqliteConnectOptions) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations. Safe to run on every start.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Round-trip to the database, for health checks.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database ping failed")?;
        Ok(())
    }

    // ========================
    // Seller operations
    // ========================

    /// Save a new seller and return it with its assigned id.
    pub async fn save_seller(&self, seller: &NewSeller) -> Result<Seller> {
        let row = sqlx::query(
            r#"
            INSERT INTO sellers (name, contact_info, registration_date)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&seller.name)
        .bind(&seller.contact_info)
        .bind(encode_timestamp(seller.registration_date))
        .fetch_one(&self.pool)
        .await
        .context("Failed to save seller")?;

        Ok(Seller {
            id: row.get("id"),
            name: seller.name.clone(),
            contact_info: seller.contact_info.clone(),
            registration_date: seller.registration_date,
        })
    }

    /// Get a seller by ID.
    pub async fn get_seller(&self, id: SellerId) -> Result<Option<Seller>> {
        let row = sqlx::query(&format!("SELECT {SELLER_COLUMNS} FROM sellers WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch seller")?;

        row.as_ref().map(Self::row_to_seller).transpose()
    }

    /// List all sellers, ordered by id.
    pub async fn list_sellers(&self) -> Result<Vec<Seller>> {
        let rows = sqlx::query(&format!("SELECT {SELLER_COLUMNS} FROM sellers ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .context("Failed to list sellers")?;

        rows.iter().map(Self::row_to_seller).collect()
    }

    /// Persist the mutable fields of a seller. Returns false if no row matched.
    pub async fn update_seller(&self, seller: &Seller) -> Result<bool> {
        let result = sqlx::query("UPDATE sellers SET name = ?, contact_info = ? WHERE id = ?")
            .bind(&seller.name)
            .bind(&seller.contact_info)
            .bind(seller.id)
            .execute(&self.pool)
            .await
            .context("Failed to update seller")?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a seller. Returns false if no row matched.
    pub async fn delete_seller(&self, id: SellerId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sellers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete seller")?;
        Ok(result.rows_affected() > 0)
    }

    fn row_to_seller(row: &SqliteRow) -> Result<Seller> {
        let registration_date: String = row.get("registration_date");

        Ok(Seller {
            id: row.get("id"),
            name: row.get("name"),
            contact_info: row.get("contact_info"),
            registration_date: decode_timestamp(&registration_date)
                .context("Invalid registration_date timestamp")?,
        })
    }

    // ========================
    // Transaction operations
    // ========================

    /// Save a new transaction and return it with its assigned id.
    pub async fn save_transaction(&self, transaction: &NewTransaction) -> Result<Transaction> {
        let row = sqlx::query(
            r#"
            INSERT INTO transactions (seller_id, amount_cents, payment_type, transaction_date)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(transaction.seller_id)
        .bind(transaction.amount_cents)
        .bind(transaction.payment_type.as_str())
        .bind(encode_timestamp(transaction.transaction_date))
        .fetch_one(&self.pool)
        .await
        .context("Failed to save transaction")?;

        Ok(Transaction {
            id: row.get("id"),
            seller_id: transaction.seller_id,
            amount_cents: transaction.amount_cents,
            payment_type: transaction.payment_type,
            transaction_date: transaction.transaction_date,
        })
    }

    /// Get a transaction by ID.
    pub async fn get_transaction(&self, id: TransactionId) -> Result<Option<Transaction>> {
        let row = sqlx::query(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch transaction")?;

        row.as_ref().map(Self::row_to_transaction).transpose()
    }

    /// List all transactions, ordered by id.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// List the transactions of one seller, ordered by id.
    pub async fn list_transactions_for_seller(
        &self,
        seller_id: SellerId,
    ) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE seller_id = ? ORDER BY id"
        ))
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions for seller")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Count the transactions referencing a seller.
    pub async fn count_transactions_for_seller(&self, seller_id: SellerId) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM transactions WHERE seller_id = ?")
            .bind(seller_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count transactions for seller")?;

        Ok(row.get("count"))
    }

    fn row_to_transaction(row: &SqliteRow) -> Result<Transaction> {
        let payment_type: String = row.get("payment_type");
        let transaction_date: String = row.get("transaction_date");

        Ok(Transaction {
            id: row.get("id"),
            seller_id: row.get("seller_id"),
            amount_cents: row.get("amount_cents"),
            payment_type: PaymentType::from_str(&payment_type).map_err(anyhow::Error::msg)?,
            transaction_date: decode_timestamp(&transaction_date)
                .context("Invalid transaction_date timestamp")?,
        })
    }

    // ========================
    // Aggregations
    // ========================

    /// Seller with the largest summed income in `[from_date, to_date]`.
    /// Equal sums resolve to the lowest seller id.
    pub async fn top_seller_by_period(
        &self,
        from_date: DateTime<Utc>,
        to_date: DateTime<Utc>,
    ) -> Result<Option<SellerIncome>> {
        let row = sqlx::query(
            r#"
            SELECT s.id, s.name, s.contact_info, s.registration_date, SUM(t.amount_cents) as total
            FROM transactions t
            JOIN sellers s ON s.id = t.seller_id
            WHERE t.transaction_date >= ? AND t.transaction_date <= ?
            GROUP BY s.id, s.name, s.contact_info, s.registration_date
            ORDER BY total DESC, s.id ASC
            LIMIT 1
            "#,
        )
        .bind(encode_timestamp(from_date))
        .bind(encode_timestamp(to_date))
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find top seller")?;

        row.as_ref().map(Self::row_to_seller_income).transpose()
    }

    /// Sellers whose summed income in `[from_date, to_date]` is strictly below `threshold`,
    /// by descending income. Sellers without transactions in the window are not grouped at all.
    pub async fn sellers_with_income_below(
        &self,
        threshold: Cents,
        from_date: DateTime<Utc>,
        to_date: DateTime<Utc>,
    ) -> Result<Vec<SellerIncome>> {
        let rows = sqlx::query(
            r#"
            SELECT s.id, s.name, s.contact_info, s.registration_date, SUM(t.amount_cents) as total
            FROM transactions t
            JOIN sellers s ON s.id = t.seller_id
            WHERE t.transaction_date >= ? AND t.transaction_date <= ?
            GROUP BY s.id, s.name, s.contact_info, s.registration_date
            HAVING SUM(t.amount_cents) < ?
            ORDER BY total DESC, s.id ASC
            "#,
        )
        .bind(encode_timestamp(from_date))
        .bind(encode_timestamp(to_date))
        .bind(threshold)
        .fetch_all(&self.pool)
        .await
        .context("Failed to find sellers below income threshold")?;

        rows.iter().map(Self::row_to_seller_income).collect()
    }

    fn row_to_seller_income(row: &SqliteRow) -> Result<SellerIncome> {
        Ok(SellerIncome {
            seller: Self::row_to_seller(row)?,
            total: row.get("total"),
        })
    }
}

/// Fixed-width UTC form, so that text order in SQLite equals time order.
fn encode_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}
