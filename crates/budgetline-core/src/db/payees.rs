//! Payee operations

use rusqlite::{params, OptionalExtension, Row};

use super::{format_date, get_date, Database};
use crate::error::Result;
use crate::models::{NewPayee, Payee};

const PAYEE_COLUMNS: &str = "id, name, effective_from, budget_category_id, version";

fn payee_from_row(row: &Row<'_>) -> rusqlite::Result<Payee> {
    Ok(Payee {
        id: row.get(0)?,
        name: row.get(1)?,
        effective_from: get_date(row, 2)?,
        budget_category_id: row.get(3)?,
        version: row.get(4)?,
    })
}

impl Database {
    /// Create a new payee
    pub fn create_payee(&self, payee: &NewPayee) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO payees (name, effective_from, budget_category_id) VALUES (?, ?, ?)",
            params![
                payee.name,
                format_date(payee.effective_from),
                payee.budget_category_id
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a payee by ID
    pub fn get_payee(&self, id: i64) -> Result<Option<Payee>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM payees WHERE id = ?", PAYEE_COLUMNS),
            params![id],
            payee_from_row,
        )
        .optional()
        .map_err(Into::into)
    }

    /// Get a payee by name (case-insensitive)
    pub fn get_payee_by_name(&self, name: &str) -> Result<Option<Payee>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM payees WHERE name = ?", PAYEE_COLUMNS),
            params![name],
            payee_from_row,
        )
        .optional()
        .map_err(Into::into)
    }

    /// List all payees
    pub fn list_payees(&self) -> Result<Vec<Payee>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM payees ORDER BY id", PAYEE_COLUMNS))?;

        let payees = stmt
            .query_map([], payee_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(payees)
    }

    /// Payees attached to a specific category record
    pub fn list_payees_for_category(&self, category_id: i64) -> Result<Vec<Payee>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM payees WHERE budget_category_id = ? ORDER BY effective_from, id",
            PAYEE_COLUMNS
        ))?;

        let payees = stmt
            .query_map(params![category_id], payee_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(payees)
    }

    /// Delete a payee (its aliases cascade), returning whether a row was removed
    pub fn delete_payee(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM payees WHERE id = ?", params![id])?;
        Ok(rows > 0)
    }
}
