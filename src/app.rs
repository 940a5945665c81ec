//! Application facade over validation and storage.
//!
//! All mutations go through [`GroceryApp`], which validates raw payloads
//! against a snapshot of the current list and only then touches the store.
//! A mutation lock serializes the validate-then-apply sequence so two
//! concurrent creates cannot both pass the uniqueness check.

use std::sync::Mutex;

use serde_json::Value;

use crate::config::Config;
use crate::core::{validate_create, validate_update, GroceryItem, GroceryList};
use crate::error::{PantryError, Result};
use crate::storage::{open_store, GroceryStore};

/// The grocery list application.
pub struct GroceryApp {
    store: Box<dyn GroceryStore>,
    write_lock: Mutex<()>,
}

impl GroceryApp {
    /// Build the app over the backend selected by configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_store(open_store(&config.storage)?))
    }

    /// Build the app over an explicit store.
    pub fn with_store(store: Box<dyn GroceryStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// All items, in list order.
    pub fn items(&self) -> Result<Vec<GroceryItem>> {
        self.store.list()
    }

    /// The list as a JSON array. An empty list yields `"[]"`.
    pub fn list(&self) -> Result<String> {
        self.store.serialize()
    }

    /// Validate a creation payload and append the item.
    pub fn create(&self, payload: &Value) -> Result<GroceryItem> {
        let _guard = self.write_lock.lock().unwrap();
        let snapshot = GroceryList::from(self.store.list()?);
        let item = validate_create(payload, &snapshot)?;
        self.store.add(&item)?;
        tracing::info!(name = %item.name, "added item");
        Ok(item)
    }

    /// Validate an update payload and apply it to the named item.
    pub fn update(&self, name: &str, payload: &Value) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap();
        let snapshot = GroceryList::from(self.store.list()?);
        let update = validate_update(name, payload, &snapshot)?;
        self.store.update(name, &update)?;
        tracing::info!(name = %name, field = %update.field().as_str(), "updated item");
        Ok(())
    }

    /// Remove the named item.
    ///
    /// Fails with `NotFound` when the name is absent. The storage-level
    /// delete stays idempotent; presence is this layer's check.
    pub fn delete(&self, name: &str) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap();
        if !self.store.exists(name)? {
            return Err(PantryError::not_found(name));
        }
        self.store.delete(name)?;
        tracing::info!(name = %name, "removed item");
        Ok(())
    }

    /// Flip the purchased flag on the named item.
    ///
    /// Returns the new purchased state. Fails with `NotFound` when the name
    /// is absent.
    pub fn check_off(&self, name: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().unwrap();
        let item = self
            .store
            .get(name)?
            .ok_or_else(|| PantryError::not_found(name))?;
        let next = !item.purchased;
        self.store
            .update(name, &crate::core::FieldUpdate::Purchased(next))?;
        tracing::info!(name = %name, purchased = next, "toggled item");
        Ok(next)
    }
}
