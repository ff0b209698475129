//! Payee manager

use tracing::{debug, info};

use super::{check_id_match, commit, require_id, validate_name};
use crate::db::ChangeSet;
use crate::error::{Error, Result};
use crate::models::{NewPayee, Payee, MAX_PAYEE_NAME_LEN};
use crate::sort::{PayeeSortField, SortSpec};
use crate::store::EntityStore;

const ENTITY: &str = "payee";

pub struct PayeeManager<'a, S: EntityStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: EntityStore + ?Sized> PayeeManager<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn get(&self, id: Option<i64>) -> Result<Payee> {
        let id = require_id(ENTITY, id)?;
        self.store
            .get_payee(id)?
            .ok_or(Error::IdNotFound { entity: ENTITY, id })
    }

    pub fn list(&self, sort: SortSpec<PayeeSortField>) -> Result<Vec<Payee>> {
        let mut payees = self.store.list_payees()?;
        sort.apply(&mut payees);
        Ok(payees)
    }

    pub fn add(&self, payee: NewPayee) -> Result<Payee> {
        let name = validate_name(ENTITY, &payee.name, MAX_PAYEE_NAME_LEN)?;
        self.ensure_unique(&name, None)?;
        self.ensure_category(payee.budget_category_id)?;

        let id = self.store.insert_payee(&NewPayee { name, ..payee })?;
        info!(id, "Added payee");
        self.get(Some(id))
    }

    pub fn update(&self, id: i64, payee: Payee) -> Result<Payee> {
        check_id_match(ENTITY, id, payee.id)?;
        let name = validate_name(ENTITY, &payee.name, MAX_PAYEE_NAME_LEN)?;
        if self.store.get_payee(id)?.is_none() {
            return Err(Error::IdNotFound { entity: ENTITY, id });
        }
        self.ensure_unique(&name, Some(id))?;
        self.ensure_category(payee.budget_category_id)?;

        let mut changes = ChangeSet::new();
        changes.edit_payee(Payee { name, ..payee });
        commit(self.store, changes, ENTITY, id, || {
            Ok(self.store.get_payee(id)?.is_some())
        })?;
        debug!(id, "Updated payee");
        self.get(Some(id))
    }

    /// Remove a payee and its aliases; a missing id is a no-op
    ///
    /// Fails with a constraint violation while transactions still reference it.
    pub fn remove(&self, id: i64) -> Result<bool> {
        let removed = self.store.delete_payee(id)?;
        if removed {
            info!(id, "Removed payee");
        } else {
            debug!(id, "Payee already gone");
        }
        Ok(removed)
    }

    fn ensure_unique(&self, name: &str, except: Option<i64>) -> Result<()> {
        match self.store.get_payee_by_name(name)? {
            Some(existing) if Some(existing.id) != except => {
                Err(Error::UniqueConstraintViolation {
                    entity: ENTITY,
                    name: name.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    fn ensure_category(&self, category_id: Option<i64>) -> Result<()> {
        match category_id {
            Some(id) if self.store.get_category(id)?.is_none() => Err(Error::ModelValidation(
                format!("budget category {} does not exist", id),
            )),
            _ => Ok(()),
        }
    }
}
