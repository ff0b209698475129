//! Queued edits and the atomic commit
//!
//! Edits are collected in a [`ChangeSet`] without touching the database.
//! [`Database::save_changes`] then applies all of them inside one SQLite
//! transaction. Every UPDATE is guarded by the version the record was read
//! at; if any guard fails the whole transaction rolls back and the caller
//! gets [`Error::Concurrency`]. Dropping a change set without saving it has
//! no effect on the store.

use rusqlite::params;
use tracing::{debug, info, warn};

use super::{format_date, Database};
use crate::error::{Error, Result};
use crate::models::{Alias, BudgetCategory, Payee, Transaction};

/// A queued replace-by-id edit
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Category(BudgetCategory),
    Payee(Payee),
    Transaction(Transaction),
    Alias(Alias),
}

impl Edit {
    /// Entity name used in errors and logs
    pub fn entity(&self) -> &'static str {
        match self {
            Self::Category(_) => "category",
            Self::Payee(_) => "payee",
            Self::Transaction(_) => "transaction",
            Self::Alias(_) => "alias",
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::Category(c) => c.id,
            Self::Payee(p) => p.id,
            Self::Transaction(t) => t.id,
            Self::Alias(a) => a.id,
        }
    }

    fn same_record(&self, other: &Edit) -> bool {
        self.entity() == other.entity() && self.id() == other.id()
    }
}

/// Edits waiting for a single commit
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChangeSet {
    edits: Vec<Edit>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an edit; a later edit of the same record replaces the earlier one
    pub fn push(&mut self, edit: Edit) {
        match self.edits.iter_mut().find(|queued| queued.same_record(&edit)) {
            Some(queued) => *queued = edit,
            None => self.edits.push(edit),
        }
    }

    pub fn edit_category(&mut self, category: BudgetCategory) {
        self.push(Edit::Category(category));
    }

    pub fn edit_payee(&mut self, payee: Payee) {
        self.push(Edit::Payee(payee));
    }

    pub fn edit_transaction(&mut self, transaction: Transaction) {
        self.push(Edit::Transaction(transaction));
    }

    pub fn edit_alias(&mut self, alias: Alias) {
        self.push(Edit::Alias(alias));
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Queued payee edits
    pub fn payees(&self) -> impl Iterator<Item = &Payee> {
        self.edits.iter().filter_map(|edit| match edit {
            Edit::Payee(p) => Some(p),
            _ => None,
        })
    }

    /// Queued transaction edits
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.edits.iter().filter_map(|edit| match edit {
            Edit::Transaction(t) => Some(t),
            _ => None,
        })
    }

    /// Queued category edits
    pub fn categories(&self) -> impl Iterator<Item = &BudgetCategory> {
        self.edits.iter().filter_map(|edit| match edit {
            Edit::Category(c) => Some(c),
            _ => None,
        })
    }
}

impl Database {
    /// Apply every queued edit atomically, returning the number of rows changed
    pub fn save_changes(&self, changes: ChangeSet) -> Result<usize> {
        if changes.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut affected = 0;

        for edit in &changes.edits {
            let rows = match edit {
                Edit::Category(c) => tx.execute(
                    "UPDATE budget_categories
                     SET name = ?, amount = ?, type = ?, effective_from = ?, effective_to = ?,
                         version = version + 1
                     WHERE id = ? AND version = ?",
                    params![
                        c.name,
                        c.amount,
                        c.category_type.as_str(),
                        format_date(c.effective_from),
                        c.effective_to.map(format_date),
                        c.id,
                        c.version
                    ],
                )?,
                Edit::Payee(p) => tx.execute(
                    "UPDATE payees
                     SET name = ?, effective_from = ?, budget_category_id = ?, version = version + 1
                     WHERE id = ? AND version = ?",
                    params![
                        p.name,
                        format_date(p.effective_from),
                        p.budget_category_id,
                        p.id,
                        p.version
                    ],
                )?,
                Edit::Transaction(t) => tx.execute(
                    "UPDATE transactions
                     SET date = ?, amount = ?, payee_id = ?, override_category_id = ?,
                         version = version + 1
                     WHERE id = ? AND version = ?",
                    params![
                        format_date(t.date),
                        t.amount,
                        t.payee_id,
                        t.override_category_id,
                        t.id,
                        t.version
                    ],
                )?,
                Edit::Alias(a) => tx.execute(
                    "UPDATE aliases SET name = ?, payee_id = ?, version = version + 1
                     WHERE id = ? AND version = ?",
                    params![a.name, a.payee_id, a.id, a.version],
                )?,
            };

            if rows == 0 {
                // Dropping `tx` rolls back everything applied so far
                warn!(
                    entity = edit.entity(),
                    id = edit.id(),
                    "Version check failed, rolling back change set"
                );
                return Err(Error::Concurrency {
                    entity: edit.entity(),
                    id: edit.id(),
                });
            }

            debug!(entity = edit.entity(), id = edit.id(), "Applied edit");
            affected += rows;
        }

        tx.commit()?;
        info!(edits = changes.len(), rows = affected, "Saved changes");
        Ok(affected)
    }
}
