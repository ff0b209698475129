//! CRUD manager services
//!
//! One manager per entity type, each borrowing an [`EntityStore`]:
//! - `categories` - category CRUD; edits go through the split engine
//! - `payees` - payee CRUD with unique names
//! - `transactions` - transaction CRUD with currency rounding
//! - `aliases` - alias CRUD and statement-name resolution
//!
//! Updates are committed through a [`ChangeSet`]. A version conflict at
//! commit is reported as `Concurrency` while the record still exists and as
//! `IdNotFound` once it has been deleted.

use crate::db::ChangeSet;
use crate::error::{Error, Result};
use crate::store::EntityStore;

mod aliases;
mod categories;
mod payees;
mod transactions;

pub use aliases::AliasManager;
pub use categories::CategoryManager;
pub use payees::PayeeManager;
pub use transactions::TransactionManager;

/// Unwrap an optional identifier or fail with `NullId`
pub(crate) fn require_id(entity: &'static str, id: Option<i64>) -> Result<i64> {
    id.ok_or(Error::NullId(entity))
}

/// Trim a name and check it is non-empty and at most `max` characters
pub(crate) fn validate_name(entity: &'static str, name: &str, max: usize) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::ModelValidation(format!("{} name is required", entity)));
    }
    if trimmed.chars().count() > max {
        return Err(Error::ModelValidation(format!(
            "{} name must be at most {} characters",
            entity, max
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn check_id_match(entity: &'static str, path_id: i64, payload_id: i64) -> Result<()> {
    if path_id != payload_id {
        return Err(Error::IdMismatch {
            entity,
            path_id,
            payload_id,
        });
    }
    Ok(())
}

pub(crate) fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(Error::ModelValidation("amount must be a finite number".to_string()));
    }
    Ok(())
}

/// Commit `changes`; if the commit loses a version race on the record being
/// updated, report `IdNotFound` when `still_exists` says it is gone
pub(crate) fn commit<S, F>(
    store: &S,
    changes: ChangeSet,
    entity: &'static str,
    id: i64,
    still_exists: F,
) -> Result<usize>
where
    S: EntityStore + ?Sized,
    F: FnOnce() -> Result<bool>,
{
    match store.save_changes(changes) {
        Err(conflict @ Error::Concurrency { .. }) => {
            if still_exists()? {
                Err(conflict)
            } else {
                Err(Error::IdNotFound { entity, id })
            }
        }
        other => other,
    }
}
