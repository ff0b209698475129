//! Budget category manager

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use super::{check_id_match, commit, require_id, validate_amount, validate_name};
use crate::db::ChangeSet;
use crate::error::{Error, Result};
use crate::models::{round_currency, BudgetCategory, NewBudgetCategory, MAX_CATEGORY_NAME_LEN};
use crate::sort::{CategorySortField, SortSpec};
use crate::split::{CategorySplitter, SplitOutcome};
use crate::store::EntityStore;

const ENTITY: &str = "category";

pub struct CategoryManager<'a, S: EntityStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: EntityStore + ?Sized> CategoryManager<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn get(&self, id: Option<i64>) -> Result<BudgetCategory> {
        let id = require_id(ENTITY, id)?;
        self.store
            .get_category(id)?
            .ok_or(Error::IdNotFound { entity: ENTITY, id })
    }

    pub fn list(&self, sort: SortSpec<CategorySortField>) -> Result<Vec<BudgetCategory>> {
        let mut categories = self.store.list_categories()?;
        sort.apply(&mut categories);
        Ok(categories)
    }

    /// Every slice of a category name, oldest first
    pub fn history(&self, name: &str) -> Result<Vec<BudgetCategory>> {
        self.store.categories_named(name.trim())
    }

    /// The slices in effect on `date`
    pub fn active_on(
        &self,
        date: NaiveDate,
        sort: SortSpec<CategorySortField>,
    ) -> Result<Vec<BudgetCategory>> {
        let mut categories: Vec<_> = self
            .store
            .list_categories()?
            .into_iter()
            .filter(|c| c.is_active_on(date))
            .collect();
        sort.apply(&mut categories);
        Ok(categories)
    }

    /// Add a category record with no predecessor
    ///
    /// The new range may not overlap an existing slice of the same name.
    pub fn add(&self, category: NewBudgetCategory) -> Result<BudgetCategory> {
        let name = validate_name(ENTITY, &category.name, MAX_CATEGORY_NAME_LEN)?;
        validate_amount(category.amount)?;
        if let Some(to) = category.effective_to {
            if to < category.effective_from {
                return Err(Error::ModelValidation(format!(
                    "effective_to {} is before effective_from {}",
                    to, category.effective_from
                )));
            }
        }

        let normalized = NewBudgetCategory {
            name,
            amount: round_currency(category.amount),
            ..category
        };

        let candidate = BudgetCategory {
            id: 0,
            name: normalized.name.clone(),
            amount: normalized.amount,
            category_type: normalized.category_type,
            effective_from: normalized.effective_from,
            effective_to: normalized.effective_to,
            version: 0,
        };
        if let Some(existing) = self
            .store
            .categories_named(&normalized.name)?
            .into_iter()
            .find(|c| c.overlaps(&candidate))
        {
            return Err(Error::ModelValidation(format!(
                "'{}' already has a slice in effect from {} (id {})",
                existing.name, existing.effective_from, existing.id
            )));
        }

        let id = self.store.insert_category(&normalized)?;
        info!(id, name = %normalized.name, "Added category");
        self.get(Some(id))
    }

    /// Edit a category with its new values taking effect on `effective_date`
    pub fn update(
        &self,
        id: i64,
        category: BudgetCategory,
        effective_date: NaiveDate,
    ) -> Result<BudgetCategory> {
        self.update_as_of(id, category, effective_date, Local::now().date_naive())
    }

    /// [`update`](Self::update) with an explicit notion of today
    pub fn update_as_of(
        &self,
        id: i64,
        category: BudgetCategory,
        effective_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<BudgetCategory> {
        self.split(id, category, effective_date, today)?;
        self.get(Some(id))
    }

    /// Run the split and commit it, returning what was changed
    pub fn split(
        &self,
        id: i64,
        category: BudgetCategory,
        effective_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<SplitOutcome> {
        check_id_match(ENTITY, id, category.id)?;
        let name = validate_name(ENTITY, &category.name, MAX_CATEGORY_NAME_LEN)?;
        validate_amount(category.amount)?;
        let edited = BudgetCategory {
            name,
            amount: round_currency(category.amount),
            ..category
        };

        let mut changes = ChangeSet::new();
        let outcome = CategorySplitter::new(self.store).update_category(
            &mut changes,
            id,
            &edited,
            effective_date,
            today,
        )?;
        debug!(
            id,
            categories = changes.categories().count(),
            payees = changes.payees().count(),
            transactions = changes.transactions().count(),
            "Committing category split"
        );

        let rows = commit(self.store, changes, ENTITY, id, || {
            Ok(self.store.get_category(id)?.is_some())
        })?;
        debug!(id, rows, "Category split committed");
        Ok(outcome)
    }

    /// Remove a category record; a missing id is a no-op
    pub fn remove(&self, id: i64) -> Result<bool> {
        let removed = self.store.delete_category(id)?;
        if removed {
            info!(id, "Removed category");
        } else {
            debug!(id, "Category already gone");
        }
        Ok(removed)
    }
}
