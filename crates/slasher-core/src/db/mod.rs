//! Database access layer: schema ownership and atomic units of work
//!
//! This module is organized by domain:
//! - `transactions` - Transaction CRUD and composite search
//! - `tags` - Tag lookup, transaction-tag links, and orphan pruning
//! - `reports` - Aggregates computed directly in SQL
//!
//! A `Database` owns exactly one SQLite connection (a pool of size one), so
//! every mutating sequence runs against the same handle and writers are
//! serialized. Mutations run inside an IMMEDIATE transaction that is rolled
//! back as a whole when any step fails.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::TransactionBehavior;
use tracing::{debug, error, info, warn};

use crate::error::Result;

mod reports;
mod tags;
mod transaction_filter;
mod transactions;

pub use transaction_filter::{AmountFilter, FilterResult, TransactionFilter};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Separator used when aggregating tag names in SQL; cannot appear in typed input
pub(crate) const TAG_SEPARATOR: char = '\u{1f}';

/// Storage engine handle
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (or create) the database file and make sure the schema exists
    pub fn open(path: &str) -> Result<Self> {
        // Foreign keys are a per-connection setting; cascades depend on it
        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

        let pool = Pool::builder().max_size(1).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.initialize()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a uniquely named temporary file rather than `:memory:` so the
    /// pooled connection can be recycled without losing data.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "slasher_test_{}_{}.db",
            std::process::id(),
            id
        ));

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::open(&path.to_string_lossy())
    }

    /// Get the connection handle
    ///
    /// There is only one; drop it before calling another `Database` method.
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Create the three tables if absent. Existing tables are left untouched.
    pub fn initialize(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- AUTOINCREMENT: ids are never reused, even after deletes
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,                        -- YYYY-MM-DD
                description TEXT NOT NULL,
                amount REAL NOT NULL,                      -- positive = expense, negative = income
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS transactions_tags (
                transaction_id INTEGER NOT NULL REFERENCES transactions(id) ON DELETE CASCADE,
                tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                PRIMARY KEY (transaction_id, tag_id)
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_tags_tag ON transactions_tags(tag_id);
            "#,
        )?;

        info!(path = %self.db_path, "Database schema initialized");
        Ok(())
    }

    /// Run `op` inside one IMMEDIATE transaction
    ///
    /// Commits when `op` succeeds. Any error rolls back every write made by
    /// `op`, is logged with the operation name, and is returned to the caller.
    pub(crate) fn in_transaction<T, F>(&self, operation: &'static str, op: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        match op(&tx) {
            Ok(value) => {
                if let Err(e) = tx.commit() {
                    error!(operation, error = %e, "Commit failed");
                    return Err(e.into());
                }
                debug!(operation, "Committed");
                Ok(value)
            }
            Err(e) => {
                error!(operation, error = %e, "Rolling back");
                if let Err(rollback_err) = tx.rollback() {
                    warn!(operation, error = %rollback_err, "Rollback failed");
                }
                Err(e)
            }
        }
    }
}
