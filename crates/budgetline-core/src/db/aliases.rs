//! Alias operations

use rusqlite::{params, OptionalExtension, Row};

use super::Database;
use crate::error::Result;
use crate::models::{Alias, NewAlias};

const ALIAS_COLUMNS: &str = "id, name, payee_id, version";

fn alias_from_row(row: &Row<'_>) -> rusqlite::Result<Alias> {
    Ok(Alias {
        id: row.get(0)?,
        name: row.get(1)?,
        payee_id: row.get(2)?,
        version: row.get(3)?,
    })
}

impl Database {
    /// Create a new alias
    pub fn create_alias(&self, alias: &NewAlias) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO aliases (name, payee_id) VALUES (?, ?)",
            params![alias.name, alias.payee_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get an alias by ID
    pub fn get_alias(&self, id: i64) -> Result<Option<Alias>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM aliases WHERE id = ?", ALIAS_COLUMNS),
            params![id],
            alias_from_row,
        )
        .optional()
        .map_err(Into::into)
    }

    /// Get an alias by name (case-insensitive)
    pub fn get_alias_by_name(&self, name: &str) -> Result<Option<Alias>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM aliases WHERE name = ?", ALIAS_COLUMNS),
            params![name],
            alias_from_row,
        )
        .optional()
        .map_err(Into::into)
    }

    /// List all aliases
    pub fn list_aliases(&self) -> Result<Vec<Alias>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM aliases ORDER BY id", ALIAS_COLUMNS))?;

        let aliases = stmt
            .query_map([], alias_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(aliases)
    }

    /// Delete an alias, returning whether a row was removed
    pub fn delete_alias(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM aliases WHERE id = ?", params![id])?;
        Ok(rows > 0)
    }
}
