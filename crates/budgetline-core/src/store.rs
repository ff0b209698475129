//! Entity store contract consumed by the services and the split engine
//!
//! Services take the store by reference at construction time, so tests and
//! alternative backends can supply their own implementation.

use crate::db::{ChangeSet, Database};
use crate::error::Result;
use crate::models::{
    Alias, BudgetCategory, NewAlias, NewBudgetCategory, NewPayee, NewTransaction, Payee,
    Transaction,
};

pub trait EntityStore {
    // Categories
    fn list_categories(&self) -> Result<Vec<BudgetCategory>>;
    /// Records sharing `name`, ordered by `effective_from`
    fn categories_named(&self, name: &str) -> Result<Vec<BudgetCategory>>;
    fn get_category(&self, id: i64) -> Result<Option<BudgetCategory>>;
    fn insert_category(&self, category: &NewBudgetCategory) -> Result<i64>;
    fn delete_category(&self, id: i64) -> Result<bool>;

    // Payees
    fn list_payees(&self) -> Result<Vec<Payee>>;
    fn payees_for_category(&self, category_id: i64) -> Result<Vec<Payee>>;
    fn get_payee(&self, id: i64) -> Result<Option<Payee>>;
    fn get_payee_by_name(&self, name: &str) -> Result<Option<Payee>>;
    fn insert_payee(&self, payee: &NewPayee) -> Result<i64>;
    fn delete_payee(&self, id: i64) -> Result<bool>;

    // Transactions
    fn list_transactions(&self) -> Result<Vec<Transaction>>;
    fn transactions_overriding(&self, category_id: i64) -> Result<Vec<Transaction>>;
    fn get_transaction(&self, id: i64) -> Result<Option<Transaction>>;
    fn insert_transaction(&self, transaction: &NewTransaction) -> Result<i64>;
    fn delete_transaction(&self, id: i64) -> Result<bool>;

    // Aliases
    fn list_aliases(&self) -> Result<Vec<Alias>>;
    fn get_alias(&self, id: i64) -> Result<Option<Alias>>;
    fn get_alias_by_name(&self, name: &str) -> Result<Option<Alias>>;
    fn insert_alias(&self, alias: &NewAlias) -> Result<i64>;
    fn delete_alias(&self, id: i64) -> Result<bool>;

    /// Durability boundary: apply every queued edit or none of them
    fn save_changes(&self, changes: ChangeSet) -> Result<usize>;
}

impl EntityStore for Database {
    fn list_categories(&self) -> Result<Vec<BudgetCategory>> {
        Database::list_categories(self)
    }

    fn categories_named(&self, name: &str) -> Result<Vec<BudgetCategory>> {
        self.list_categories_named(name)
    }

    fn get_category(&self, id: i64) -> Result<Option<BudgetCategory>> {
        Database::get_category(self, id)
    }

    fn insert_category(&self, category: &NewBudgetCategory) -> Result<i64> {
        self.create_category(category)
    }

    fn delete_category(&self, id: i64) -> Result<bool> {
        Database::delete_category(self, id)
    }

    fn list_payees(&self) -> Result<Vec<Payee>> {
        Database::list_payees(self)
    }

    fn payees_for_category(&self, category_id: i64) -> Result<Vec<Payee>> {
        self.list_payees_for_category(category_id)
    }

    fn get_payee(&self, id: i64) -> Result<Option<Payee>> {
        Database::get_payee(self, id)
    }

    fn get_payee_by_name(&self, name: &str) -> Result<Option<Payee>> {
        Database::get_payee_by_name(self, name)
    }

    fn insert_payee(&self, payee: &NewPayee) -> Result<i64> {
        self.create_payee(payee)
    }

    fn delete_payee(&self, id: i64) -> Result<bool> {
        Database::delete_payee(self, id)
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        Database::list_transactions(self)
    }

    fn transactions_overriding(&self, category_id: i64) -> Result<Vec<Transaction>> {
        self.list_transactions_overriding(category_id)
    }

    fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        Database::get_transaction(self, id)
    }

    fn insert_transaction(&self, transaction: &NewTransaction) -> Result<i64> {
        self.create_transaction(transaction)
    }

    fn delete_transaction(&self, id: i64) -> Result<bool> {
        Database::delete_transaction(self, id)
    }

    fn list_aliases(&self) -> Result<Vec<Alias>> {
        Database::list_aliases(self)
    }

    fn get_alias(&self, id: i64) -> Result<Option<Alias>> {
        Database::get_alias(self, id)
    }

    fn get_alias_by_name(&self, name: &str) -> Result<Option<Alias>> {
        Database::get_alias_by_name(self, name)
    }

    fn insert_alias(&self, alias: &NewAlias) -> Result<i64> {
        self.create_alias(alias)
    }

    fn delete_alias(&self, id: i64) -> Result<bool> {
        Database::delete_alias(self, id)
    }

    fn save_changes(&self, changes: ChangeSet) -> Result<usize> {
        Database::save_changes(self, changes)
    }
}
