//! Budget category record operations

use rusqlite::{params, OptionalExtension, Row};

use super::{format_date, get_date, get_optional_date, Database};
use crate::error::Result;
use crate::models::{BudgetCategory, CategoryType, NewBudgetCategory};

const CATEGORY_COLUMNS: &str =
    "id, name, amount, type, effective_from, effective_to, version";

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<BudgetCategory> {
    let type_str: String = row.get(3)?;
    Ok(BudgetCategory {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: row.get(2)?,
        category_type: type_str.parse().unwrap_or(CategoryType::Expense),
        effective_from: get_date(row, 4)?,
        effective_to: get_optional_date(row, 5)?,
        version: row.get(6)?,
    })
}

impl Database {
    /// Create a new category record
    pub fn create_category(&self, category: &NewBudgetCategory) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO budget_categories (name, amount, type, effective_from, effective_to) VALUES (?, ?, ?, ?, ?)",
            params![
                category.name,
                category.amount,
                category.category_type.as_str(),
                format_date(category.effective_from),
                category.effective_to.map(format_date),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a category record by ID
    pub fn get_category(&self, id: i64) -> Result<Option<BudgetCategory>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM budget_categories WHERE id = ?",
                CATEGORY_COLUMNS
            ),
            params![id],
            category_from_row,
        )
        .optional()
        .map_err(Into::into)
    }

    /// List every category record, in store order
    pub fn list_categories(&self) -> Result<Vec<BudgetCategory>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM budget_categories ORDER BY id",
            CATEGORY_COLUMNS
        ))?;

        let categories = stmt
            .query_map([], category_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// All records sharing a category name, oldest slice first
    pub fn list_categories_named(&self, name: &str) -> Result<Vec<BudgetCategory>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM budget_categories WHERE name = ? ORDER BY effective_from, id",
            CATEGORY_COLUMNS
        ))?;

        let categories = stmt
            .query_map(params![name], category_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Delete a category record, returning whether a row was removed
    pub fn delete_category(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM budget_categories WHERE id = ?", params![id])?;
        Ok(rows > 0)
    }
}
