//! Alias manager and statement-name resolution

use tracing::{debug, info};

use super::{check_id_match, commit, require_id, validate_name};
use crate::db::ChangeSet;
use crate::error::{Error, Result};
use crate::models::{Alias, NewAlias, Payee, MAX_ALIAS_NAME_LEN};
use crate::sort::{AliasSortField, SortSpec};
use crate::store::EntityStore;

const ENTITY: &str = "alias";

pub struct AliasManager<'a, S: EntityStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: EntityStore + ?Sized> AliasManager<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn get(&self, id: Option<i64>) -> Result<Alias> {
        let id = require_id(ENTITY, id)?;
        self.store
            .get_alias(id)?
            .ok_or(Error::IdNotFound { entity: ENTITY, id })
    }

    pub fn list(&self, sort: SortSpec<AliasSortField>) -> Result<Vec<Alias>> {
        let mut aliases = self.store.list_aliases()?;
        sort.apply(&mut aliases);
        Ok(aliases)
    }

    /// Add an alias; names are unique across all payees
    pub fn add(&self, alias: NewAlias) -> Result<Alias> {
        let name = validate_name(ENTITY, &alias.name, MAX_ALIAS_NAME_LEN)?;
        self.ensure_unique(&name, None)?;
        self.ensure_payee(alias.payee_id)?;

        let id = self.store.insert_alias(&NewAlias { name, ..alias })?;
        info!(id, payee = alias.payee_id, "Added alias");
        self.get(Some(id))
    }

    pub fn update(&self, id: i64, alias: Alias) -> Result<Alias> {
        check_id_match(ENTITY, id, alias.id)?;
        let name = validate_name(ENTITY, &alias.name, MAX_ALIAS_NAME_LEN)?;
        if self.store.get_alias(id)?.is_none() {
            return Err(Error::IdNotFound { entity: ENTITY, id });
        }
        self.ensure_unique(&name, Some(id))?;
        self.ensure_payee(alias.payee_id)?;

        let mut changes = ChangeSet::new();
        changes.edit_alias(Alias { name, ..alias });
        commit(self.store, changes, ENTITY, id, || {
            Ok(self.store.get_alias(id)?.is_some())
        })?;
        debug!(id, "Updated alias");
        self.get(Some(id))
    }

    /// Remove an alias; a missing id is a no-op
    pub fn remove(&self, id: i64) -> Result<bool> {
        let removed = self.store.delete_alias(id)?;
        if removed {
            info!(id, "Removed alias");
        } else {
            debug!(id, "Alias already gone");
        }
        Ok(removed)
    }

    /// Map a raw statement payee string to its canonical payee
    ///
    /// Aliases win over payee names. Matching ignores case and surrounding
    /// whitespace.
    pub fn resolve(&self, raw: &str) -> Result<Option<Payee>> {
        let name = raw.trim();
        if name.is_empty() {
            return Ok(None);
        }

        if let Some(alias) = self.store.get_alias_by_name(name)? {
            debug!(alias = alias.id, payee = alias.payee_id, "Resolved by alias");
            return self.store.get_payee(alias.payee_id);
        }

        let payee = self.store.get_payee_by_name(name)?;
        if payee.is_none() {
            debug!(raw = name, "No alias or payee matches");
        }
        Ok(payee)
    }

    fn ensure_unique(&self, name: &str, except: Option<i64>) -> Result<()> {
        match self.store.get_alias_by_name(name)? {
            Some(existing) if Some(existing.id) != except => {
                Err(Error::UniqueConstraintViolation {
                    entity: ENTITY,
                    name: name.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    fn ensure_payee(&self, payee_id: i64) -> Result<()> {
        if self.store.get_payee(payee_id)?.is_none() {
            return Err(Error::ModelValidation(format!(
                "payee {} does not exist",
                payee_id
            )));
        }
        Ok(())
    }
}
