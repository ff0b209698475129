//! Transaction operations

use rusqlite::{params, OptionalExtension, Row};

use super::{format_date, get_date, Database};
use crate::error::Result;
use crate::models::{NewTransaction, Transaction};

const TRANSACTION_COLUMNS: &str = "id, date, amount, payee_id, override_category_id, version";

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        date: get_date(row, 1)?,
        amount: row.get(2)?,
        payee_id: row.get(3)?,
        override_category_id: row.get(4)?,
        version: row.get(5)?,
    })
}

impl Database {
    /// Insert a transaction
    pub fn create_transaction(&self, tx: &NewTransaction) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO transactions (date, amount, payee_id, override_category_id) VALUES (?, ?, ?, ?)",
            params![
                format_date(tx.date),
                tx.amount,
                tx.payee_id,
                tx.override_category_id
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a transaction by ID
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM transactions WHERE id = ?",
                TRANSACTION_COLUMNS
            ),
            params![id],
            transaction_from_row,
        )
        .optional()
        .map_err(Into::into)
    }

    /// List all transactions
    pub fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions ORDER BY date, id",
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map([], transaction_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Transactions whose category override points at a specific record
    pub fn list_transactions_overriding(&self, category_id: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE override_category_id = ? ORDER BY date, id",
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![category_id], transaction_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Delete a transaction, returning whether a row was removed
    pub fn delete_transaction(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
        Ok(rows > 0)
    }
}
