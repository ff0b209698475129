//! Budgetline Core Library
//!
//! Shared functionality for the Budgetline expense tracker:
//! - Database access and migrations
//! - Budget categories with effective-dated history
//! - The category split engine that re-slices history on edit
//! - CRUD manager services for categories, payees, transactions and aliases
//! - Typed sort keys for list operations

pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod sort;
pub mod split;
pub mod store;

pub use db::{ChangeSet, Database, Edit};
pub use error::{Error, Result};
pub use models::{
    round_currency, Alias, BudgetCategory, CategoryType, NewAlias, NewBudgetCategory, NewPayee,
    NewTransaction, Payee, StoreStats, Transaction,
};
pub use services::{AliasManager, CategoryManager, PayeeManager, TransactionManager};
pub use sort::{
    parse_sort, AliasSortField, CategorySortField, PayeeSortField, SortOrder, SortSpec,
    TransactionSortField,
};
pub use split::{CategorySplitter, SplitOutcome};
pub use store::EntityStore;
