//! Category split engine
//!
//! Editing a budget category takes an effective date: the edited values apply
//! from that day on, while the amounts that were in force before it stay
//! queryable through the older record of the same name.
//!
//! Given the edited record `C` and effective date `D`:
//! 1. `C` becomes the open-ended slice `[D, None)`.
//! 2. The same-name record covering `D` (the predecessor `P`) is closed on the
//!    day before `D`.
//! 3. Payees on `P` that became relevant on or after `D` move to `C`.
//! 4. Transactions overriding to `P` dated on or after `D` move to `C`.
//!
//! The engine only queues edits into a [`ChangeSet`]; the caller commits it
//! once. Every rejection happens before anything is queued.

use chrono::{Days, NaiveDate};
use tracing::{debug, info};

use crate::db::ChangeSet;
use crate::error::{Error, Result};
use crate::models::{BudgetCategory, Payee, Transaction};
use crate::store::EntityStore;

/// What a split queued
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome {
    /// The edited record as it will be stored
    pub category: BudgetCategory,
    /// The predecessor after closing, if one covered the effective date
    pub closed_predecessor: Option<BudgetCategory>,
    pub reassigned_payees: Vec<i64>,
    pub reassigned_transactions: Vec<i64>,
}

/// Applies category edits with an effective date
pub struct CategorySplitter<'a, S: EntityStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: EntityStore + ?Sized> CategorySplitter<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Queue the edit of category `id` taking effect on `effective_date`
    ///
    /// Fails with `IdMismatch` when `edited.id != id`, `InvalidDate` when the
    /// date is after `today`, and `IdNotFound` when `id` does not exist.
    /// Later slices of the same name are left as they are.
    pub fn update_category(
        &self,
        changes: &mut ChangeSet,
        id: i64,
        edited: &BudgetCategory,
        effective_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<SplitOutcome> {
        if edited.id != id {
            return Err(Error::IdMismatch {
                entity: "category",
                path_id: id,
                payload_id: edited.id,
            });
        }

        if effective_date > today {
            return Err(Error::InvalidDate(format!(
                "effective date {} is after today ({}); category changes cannot be scheduled ahead",
                effective_date, today
            )));
        }

        if self.store.get_category(id)?.is_none() {
            return Err(Error::IdNotFound {
                entity: "category",
                id,
            });
        }

        let history = self.store.categories_named(&edited.name)?;
        let others: Vec<&BudgetCategory> = history.iter().filter(|c| c.id != id).collect();

        let mut category = edited.clone();
        category.effective_from = effective_date;
        category.effective_to = None;

        let predecessor = find_predecessor(&others, effective_date);

        let mut outcome = SplitOutcome {
            category: category.clone(),
            closed_predecessor: None,
            reassigned_payees: Vec::new(),
            reassigned_transactions: Vec::new(),
        };

        if let Some(predecessor) = predecessor {
            let mut closed = predecessor.clone();
            closed.effective_to = Some(day_before(effective_date)?);
            debug!(
                predecessor = closed.id,
                effective_to = ?closed.effective_to,
                "Closing predecessor slice"
            );

            let payees = self.store.payees_for_category(predecessor.id)?;
            let moved_payees = reassign_payees(payees, category.id, effective_date);
            let transactions = self.store.transactions_overriding(predecessor.id)?;
            let moved_transactions =
                reassign_transactions(transactions, category.id, effective_date);

            changes.edit_category(closed.clone());
            for payee in moved_payees {
                outcome.reassigned_payees.push(payee.id);
                changes.edit_payee(payee);
            }
            for transaction in moved_transactions {
                outcome.reassigned_transactions.push(transaction.id);
                changes.edit_transaction(transaction);
            }
            outcome.closed_predecessor = Some(closed);
        } else {
            debug!(category = id, %effective_date, "No predecessor covers effective date");
        }

        changes.edit_category(category);

        info!(
            category = id,
            %effective_date,
            predecessor = ?outcome.closed_predecessor.as_ref().map(|p| p.id),
            payees = outcome.reassigned_payees.len(),
            transactions = outcome.reassigned_transactions.len(),
            "Queued category split"
        );

        Ok(outcome)
    }
}

/// The latest-starting same-name slice that starts before `date` and is
/// still open on it
fn find_predecessor<'c>(
    others: &[&'c BudgetCategory],
    date: NaiveDate,
) -> Option<&'c BudgetCategory> {
    others
        .iter()
        .copied()
        .filter(|c| c.effective_from < date && c.effective_to.map_or(true, |to| to >= date))
        .max_by_key(|c| (c.effective_from, c.id))
}

fn day_before(date: NaiveDate) -> Result<NaiveDate> {
    date.checked_sub_days(Days::new(1))
        .ok_or_else(|| Error::InvalidDate(format!("no day precedes {}", date)))
}

/// Payees that belong to the period starting at `cutoff`, pointed at `target`
fn reassign_payees(payees: Vec<Payee>, target: i64, cutoff: NaiveDate) -> Vec<Payee> {
    payees
        .into_iter()
        .filter(|p| p.effective_from >= cutoff)
        .map(|mut p| {
            p.budget_category_id = Some(target);
            p
        })
        .collect()
}

/// Transactions dated on or after `cutoff`, pointed at `target`
fn reassign_transactions(
    transactions: Vec<Transaction>,
    target: i64,
    cutoff: NaiveDate,
) -> Vec<Transaction> {
    transactions
        .into_iter()
        .filter(|t| t.date >= cutoff)
        .map(|mut t| {
            t.override_category_id = Some(target);
            t
        })
        .collect()
}
