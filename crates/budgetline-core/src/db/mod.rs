//! Database access layer with connection pooling and migrations
//!
//! This module is organized by table:
//! - `categories` - Budget category records (one row per historical slice)
//! - `payees` - Payee CRUD
//! - `transactions` - Transaction CRUD
//! - `aliases` - Statement-name aliases for payees
//! - `changes` - Queued edits and the atomic `save_changes` commit

use std::sync::Arc;

use chrono::NaiveDate;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Type;
use tempfile::TempDir;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::StoreStats;

mod aliases;
mod categories;
mod changes;
mod payees;
mod transactions;

pub use changes::{ChangeSet, Edit};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Environment variable for database encryption key
pub const DB_KEY_ENV: &str = "BUDGETLINE_DB_KEY";

/// Storage format for every date column
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Derive an encryption key from a passphrase using Argon2
///
/// Uses a fixed application salt so the same passphrase always produces the same key,
/// regardless of database path.
fn derive_key(passphrase: &str) -> Result<String> {
    use argon2::{password_hash::SaltString, Argon2, PasswordHasher};

    // Changing this would invalidate all existing encrypted databases
    const APP_SALT: &[u8; 16] = b"budgetline-salt1";

    let salt = SaltString::encode_b64(APP_SALT)
        .map_err(|e| Error::Encryption(format!("Failed to create salt: {}", e)))?;

    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| Error::Encryption(format!("Failed to derive key: {}", e)))?;

    let hash_str = hash
        .hash
        .ok_or_else(|| Error::Encryption("No hash output".to_string()))?;
    Ok(hex::encode(hash_str.as_bytes()))
}

/// Format a date for storage
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a stored date column, reporting the column index on failure
pub(crate) fn parse_date(idx: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read a nullable date column
pub(crate) fn get_optional_date(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<NaiveDate>> {
    let value: Option<String> = row.get(idx)?;
    value.map(|s| parse_date(idx, &s)).transpose()
}

/// Read a required date column
pub(crate) fn get_date(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let value: String = row.get(idx)?;
    parse_date(idx, &value)
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    db_path: String,
    // Declared after the pool so connections close before the directory goes
    _scratch_dir: Option<Arc<TempDir>>,
}

impl Database {
    /// Create a new database connection pool with encryption
    ///
    /// Requires `BUDGETLINE_DB_KEY` to be set. Use `new_unencrypted()` for
    /// development/testing without encryption.
    pub fn new(path: &str) -> Result<Self> {
        match std::env::var(DB_KEY_ENV).ok() {
            Some(key) => Self::new_with_key(path, Some(&key)),
            None => Err(Error::Encryption(format!(
                "Database encryption required. Set {} environment variable with your passphrase, \
                or use --no-encrypt for unencrypted databases (not recommended for production).",
                DB_KEY_ENV
            ))),
        }
    }

    /// Create a new unencrypted database connection pool
    pub fn new_unencrypted(path: &str) -> Result<Self> {
        Self::new_with_key(path, None)
    }

    /// Create a new database with an explicit encryption key
    pub fn new_with_key(path: &str, passphrase: Option<&str>) -> Result<Self> {
        let key_pragma = match passphrase {
            Some(pass) => Some(format!("PRAGMA key = 'x\"{}\"';", derive_key(pass)?)),
            None => None,
        };

        // Foreign keys are a per-connection setting in SQLite, so every pooled
        // connection turns them on (after the key, which must come first).
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            if let Some(ref pragma) = key_pragma {
                conn.execute_batch(pragma)?;
            }
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
            _scratch_dir: None,
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a file in a fresh temporary directory rather than `:memory:`
    /// because every pooled connection to `:memory:` would see its own empty
    /// database. The directory is removed when the last clone is dropped.
    pub fn in_memory() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("budgetline_test_")
            .tempdir()?;
        let path = dir.path().join("budgetline.db");
        let path = path.to_string_lossy().into_owned();

        let mut db = Self::new_unencrypted(&path)?;
        db._scratch_dir = Some(Arc::new(dir));
        Ok(db)
    }

    /// Check if the database is encrypted
    pub fn is_encrypted(&self) -> Result<bool> {
        let conn = self.conn()?;
        // SQLCipher sets cipher_version if encryption is active
        let result: rusqlite::Result<String> =
            conn.query_row("PRAGMA cipher_version;", [], |row| row.get(0));
        Ok(result.is_ok() && std::env::var(DB_KEY_ENV).is_ok())
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Row counts per table
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.conn()?;
        let count = |table: &str| -> Result<i64> {
            Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?)
        };

        Ok(StoreStats {
            categories: count("budget_categories")?,
            payees: count("payees")?,
            transactions: count("transactions")?,
            aliases: count("aliases")?,
        })
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block the single writer
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;

            -- Budget categories: one row per historical slice of a named budget line.
            CREATE TABLE IF NOT EXISTS budget_categories (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 100),
                amount REAL NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                effective_from DATE NOT NULL,
                effective_to DATE,                          -- NULL = current slice
                version INTEGER NOT NULL DEFAULT 1,         -- optimistic concurrency token
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_categories_name ON budget_categories(name, effective_from);

            -- Payees reference one category record, not a category name
            CREATE TABLE IF NOT EXISTS payees (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE COLLATE NOCASE CHECK (length(name) BETWEEN 1 AND 50),
                effective_from DATE NOT NULL,
                budget_category_id INTEGER REFERENCES budget_categories(id) ON DELETE RESTRICT,
                version INTEGER NOT NULL DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_payees_category ON payees(budget_category_id);

            -- Transactions
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                date DATE NOT NULL,
                amount REAL NOT NULL,
                payee_id INTEGER REFERENCES payees(id) ON DELETE RESTRICT,
                override_category_id INTEGER REFERENCES budget_categories(id) ON DELETE RESTRICT,
                version INTEGER NOT NULL DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
            CREATE INDEX IF NOT EXISTS idx_transactions_payee ON transactions(payee_id);
            CREATE INDEX IF NOT EXISTS idx_transactions_override ON transactions(override_category_id);

            -- Aliases: raw statement strings mapped to canonical payees
            CREATE TABLE IF NOT EXISTS aliases (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE COLLATE NOCASE CHECK (length(name) BETWEEN 1 AND 50),
                payee_id INTEGER NOT NULL REFERENCES payees(id) ON DELETE CASCADE,
                version INTEGER NOT NULL DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_aliases_payee ON aliases(payee_id);
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
