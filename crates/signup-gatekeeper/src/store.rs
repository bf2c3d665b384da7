//! SQLite-backed account store.
//!
//! The schema carries a unique index on `visitor_id`. The gatekeeper also
//! checks for an existing account before inserting, but the index is what
//! makes the one-account-per-device invariant hold when two requests for
//! the same device race past the check; the losing insert surfaces as
//! `DuplicateDevice`.

use crate::error::GateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

const CREATE_ACCOUNTS: &str = "
    CREATE TABLE IF NOT EXISTS accounts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL,
        password TEXT NOT NULL,
        visitor_id TEXT NOT NULL
    )
";

const CREATE_VISITOR_INDEX: &str = "
    CREATE UNIQUE INDEX IF NOT EXISTS idx_accounts_visitor_id
        ON accounts (visitor_id)
";

/// Durable store of accepted accounts.
#[derive(Clone)]
pub struct AccountStore {
    pool: SqlitePool,
}

impl AccountStore {
    /// Open (creating if necessary) a file-backed store.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, GateError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| GateError::Storage(e.to_string()))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
            .map_err(|e| GateError::Storage(e.to_string()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let store = Self::connect(opts).await?;
        info!(path = %path.display(), "Account store opened");
        Ok(store)
    }

    /// Open an in-memory store. Used by tests and when persistence is not
    /// wanted.
    pub async fn in_memory() -> Result<Self, GateError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| GateError::Storage(e.to_string()))?;
        Self::connect(opts).await
    }

    async fn connect(opts: SqliteConnectOptions) -> Result<Self, GateError> {
        // SQLite permits only limited write concurrency; a single pooled
        // connection avoids "database is locked" failures. It also keeps
        // an in-memory database from splitting across connections.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create the schema if it does not exist.
    async fn migrate(&self) -> Result<(), GateError> {
        sqlx::query(CREATE_ACCOUNTS).execute(&self.pool).await?;
        sqlx::query(CREATE_VISITOR_INDEX).execute(&self.pool).await?;
        Ok(())
    }

    /// Number of accounts recorded for a visitor id. Zero or one under the
    /// unique index.
    pub async fn count_by_visitor(&self, visitor_id: &str) -> Result<i64, GateError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE visitor_id = ?1")
                .bind(visitor_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Total number of accounts.
    pub async fn count_accounts(&self) -> Result<i64, GateError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Insert an account and return its assigned id.
    ///
    /// A second insert for an already-recorded visitor id maps to
    /// `DuplicateDevice` via the unique index.
    pub async fn insert_account(
        &self,
        username: &str,
        password: &str,
        visitor_id: &str,
    ) -> Result<i64, GateError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO accounts (username, password, visitor_id)
             VALUES (?1, ?2, ?3)
             RETURNING id",
        )
        .bind(username)
        .bind(password)
        .bind(visitor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => GateError::DuplicateDevice,
            _ => GateError::from(e),
        })?;

        Ok(id)
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_count() {
        let store = AccountStore::in_memory().await.unwrap();

        assert_eq!(store.count_by_visitor("V1").await.unwrap(), 0);

        let id = store.insert_account("alice", "pw", "V1").await.unwrap();
        assert_eq!(id, 1);

        assert_eq!(store.count_by_visitor("V1").await.unwrap(), 1);
        assert_eq!(store.count_by_visitor("V2").await.unwrap(), 0);
        assert_eq!(store.count_accounts().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let store = AccountStore::in_memory().await.unwrap();

        let first = store.insert_account("alice", "pw", "V1").await.unwrap();
        let second = store.insert_account("bob", "pw2", "V2").await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_duplicate_visitor_rejected_by_index() {
        let store = AccountStore::in_memory().await.unwrap();

        store.insert_account("alice", "pw", "V1").await.unwrap();
        let result = store.insert_account("bob", "pw2", "V1").await;

        assert!(matches!(result, Err(GateError::DuplicateDevice)));
        assert_eq!(store.count_by_visitor("V1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_username_is_not_unique() {
        let store = AccountStore::in_memory().await.unwrap();

        store.insert_account("alice", "pw", "V1").await.unwrap();
        // Same username from a different device is allowed.
        store.insert_account("alice", "pw", "V2").await.unwrap();

        assert_eq!(store.count_accounts().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.db");

        {
            let store = AccountStore::open(&path).await.unwrap();
            store.insert_account("alice", "pw", "V1").await.unwrap();
        }

        let store = AccountStore::open(&path).await.unwrap();
        assert_eq!(store.count_by_visitor("V1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_health_check() {
        let store = AccountStore::in_memory().await.unwrap();
        assert!(store.health_check().await);
    }
}
