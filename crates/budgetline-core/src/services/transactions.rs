//! Transaction manager

use tracing::{debug, info};

use super::{check_id_match, commit, require_id, validate_amount};
use crate::db::ChangeSet;
use crate::error::{Error, Result};
use crate::models::{round_currency, BudgetCategory, NewTransaction, Transaction};
use crate::sort::{SortSpec, TransactionSortField};
use crate::store::EntityStore;

const ENTITY: &str = "transaction";

pub struct TransactionManager<'a, S: EntityStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: EntityStore + ?Sized> TransactionManager<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn get(&self, id: Option<i64>) -> Result<Transaction> {
        let id = require_id(ENTITY, id)?;
        self.store
            .get_transaction(id)?
            .ok_or(Error::IdNotFound { entity: ENTITY, id })
    }

    pub fn list(&self, sort: SortSpec<TransactionSortField>) -> Result<Vec<Transaction>> {
        let mut transactions = self.store.list_transactions()?;
        sort.apply(&mut transactions);
        Ok(transactions)
    }

    pub fn add(&self, transaction: NewTransaction) -> Result<Transaction> {
        validate_amount(transaction.amount)?;
        self.ensure_references(transaction.payee_id, transaction.override_category_id)?;

        let normalized = NewTransaction {
            amount: round_currency(transaction.amount),
            ..transaction
        };
        let id = self.store.insert_transaction(&normalized)?;
        info!(id, amount = normalized.amount, "Added transaction");
        self.get(Some(id))
    }

    pub fn update(&self, id: i64, transaction: Transaction) -> Result<Transaction> {
        check_id_match(ENTITY, id, transaction.id)?;
        validate_amount(transaction.amount)?;
        if self.store.get_transaction(id)?.is_none() {
            return Err(Error::IdNotFound { entity: ENTITY, id });
        }
        self.ensure_references(transaction.payee_id, transaction.override_category_id)?;

        let mut changes = ChangeSet::new();
        changes.edit_transaction(Transaction {
            amount: round_currency(transaction.amount),
            ..transaction
        });
        commit(self.store, changes, ENTITY, id, || {
            Ok(self.store.get_transaction(id)?.is_some())
        })?;
        debug!(id, "Updated transaction");
        self.get(Some(id))
    }

    /// Remove a transaction; a missing id is a no-op
    pub fn remove(&self, id: i64) -> Result<bool> {
        let removed = self.store.delete_transaction(id)?;
        if removed {
            info!(id, "Removed transaction");
        } else {
            debug!(id, "Transaction already gone");
        }
        Ok(removed)
    }

    /// The category a transaction counts against: its override, else its
    /// payee's category
    pub fn resolve_category(&self, id: i64) -> Result<Option<BudgetCategory>> {
        let transaction = self.get(Some(id))?;

        let category_id = match transaction.override_category_id {
            Some(category_id) => Some(category_id),
            None => match transaction.payee_id {
                Some(payee_id) => self
                    .store
                    .get_payee(payee_id)?
                    .and_then(|p| p.budget_category_id),
                None => None,
            },
        };

        match category_id {
            Some(category_id) => self.store.get_category(category_id),
            None => Ok(None),
        }
    }

    fn ensure_references(&self, payee_id: Option<i64>, category_id: Option<i64>) -> Result<()> {
        if let Some(payee_id) = payee_id {
            if self.store.get_payee(payee_id)?.is_none() {
                return Err(Error::ModelValidation(format!(
                    "payee {} does not exist",
                    payee_id
                )));
            }
        }
        if let Some(category_id) = category_id {
            if self.store.get_category(category_id)?.is_none() {
                return Err(Error::ModelValidation(format!(
                    "budget category {} does not exist",
                    category_id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{CategoryType, NewBudgetCategory, NewPayee};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seed_category(db: &Database, name: &str) -> i64 {
        db.create_category(&NewBudgetCategory {
            name: name.to_string(),
            amount: 50.0,
            category_type: CategoryType::Expense,
            effective_from: date(2020, 1, 1),
            effective_to: None,
        })
        .unwrap()
    }

    fn new_transaction(amount: f64) -> NewTransaction {
        NewTransaction {
            date: date(2023, 3, 14),
            amount,
            payee_id: None,
            override_category_id: None,
        }
    }

    #[test]
    fn test_add_rounds_half_away_from_zero() {
        let db = Database::in_memory().unwrap();
        let manager = TransactionManager::new(&db);

        assert_eq!(manager.add(new_transaction(10.005)).unwrap().amount, 10.01);
        assert_eq!(manager.add(new_transaction(-10.005)).unwrap().amount, -10.01);
        assert_eq!(manager.add(new_transaction(3.14159)).unwrap().amount, 3.14);
    }

    #[test]
    fn test_update_rounds_and_bumps_version() {
        let db = Database::in_memory().unwrap();
        let manager = TransactionManager::new(&db);
        let added = manager.add(new_transaction(-20.0)).unwrap();

        let mut edited = added.clone();
        edited.amount = -19.995;
        let updated = manager.update(added.id, edited).unwrap();
        assert_eq!(updated.amount, -20.0);
        assert_eq!(updated.version, added.version + 1);
    }

    #[test]
    fn test_references_must_exist() {
        let db = Database::in_memory().unwrap();
        let manager = TransactionManager::new(&db);

        let mut with_payee = new_transaction(1.0);
        with_payee.payee_id = Some(42);
        assert!(matches!(
            manager.add(with_payee),
            Err(Error::ModelValidation(_))
        ));

        let mut with_category = new_transaction(1.0);
        with_category.override_category_id = Some(42);
        assert!(matches!(
            manager.add(with_category),
            Err(Error::ModelValidation(_))
        ));
    }

    #[test]
    fn test_update_missing_and_mismatched() {
        let db = Database::in_memory().unwrap();
        let manager = TransactionManager::new(&db);
        let added = manager.add(new_transaction(5.0)).unwrap();

        let mut other = added.clone();
        other.id = added.id + 1;
        assert!(matches!(
            manager.update(added.id, other.clone()),
            Err(Error::IdMismatch { .. })
        ));
        assert!(matches!(
            manager.update(other.id, other),
            Err(Error::IdNotFound { .. })
        ));
    }

    #[test]
    fn test_resolve_category_prefers_override() {
        let db = Database::in_memory().unwrap();
        let groceries = seed_category(&db, "Groceries");
        let dining = seed_category(&db, "Dining");
        let payee = db
            .create_payee(&NewPayee {
                name: "Corner Shop".to_string(),
                effective_from: date(2020, 1, 1),
                budget_category_id: Some(groceries),
            })
            .unwrap();
        let manager = TransactionManager::new(&db);

        let mut via_payee = new_transaction(-8.0);
        via_payee.payee_id = Some(payee);
        let via_payee = manager.add(via_payee).unwrap();

        let mut overridden = new_transaction(-12.0);
        overridden.payee_id = Some(payee);
        overridden.override_category_id = Some(dining);
        let overridden = manager.add(overridden).unwrap();

        let uncategorized = manager.add(new_transaction(-1.0)).unwrap();

        assert_eq!(
            manager.resolve_category(via_payee.id).unwrap().map(|c| c.id),
            Some(groceries)
        );
        assert_eq!(
            manager.resolve_category(overridden.id).unwrap().map(|c| c.id),
            Some(dining)
        );
        assert!(manager.resolve_category(uncategorized.id).unwrap().is_none());
        assert!(matches!(
            manager.resolve_category(999),
            Err(Error::IdNotFound { .. })
        ));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let db = Database::in_memory().unwrap();
        let manager = TransactionManager::new(&db);
        let added = manager.add(new_transaction(5.0)).unwrap();

        assert!(manager.remove(added.id).unwrap());
        assert!(!manager.remove(added.id).unwrap());
    }
}
