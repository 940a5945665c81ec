//! Storage trait for grocery lists.
//!
//! This module defines the `GroceryStore` trait implemented by the three
//! backends (in-memory, file-backed, remote table). Stores assume the caller
//! has already validated items and updates; they never re-check.

use std::sync::Arc;

use crate::core::{FieldUpdate, GroceryItem};
use crate::error::Result;

/// Trait for grocery list storage backends.
pub trait GroceryStore: Send + Sync {
    /// Retrieve an item by exact name.
    ///
    /// Returns `Ok(None)` if the item doesn't exist; absence is a valid
    /// outcome, not a failure.
    fn get(&self, name: &str) -> Result<Option<GroceryItem>>;

    /// Append a validated item.
    ///
    /// Uniqueness and field correctness are the validation layer's
    /// responsibility. Persistence failures are surfaced, never allowed to
    /// silently leave memory and storage out of sync.
    fn add(&self, item: &GroceryItem) -> Result<()>;

    /// Remove the named item if present.
    ///
    /// Removing an absent name is a silent no-op.
    fn delete(&self, name: &str) -> Result<()>;

    /// Apply a validated single-field update to the named item.
    ///
    /// Fails with `NotFound` when the name is absent.
    fn update(&self, name: &str, update: &FieldUpdate) -> Result<()>;

    /// All items in insertion order.
    fn list(&self) -> Result<Vec<GroceryItem>>;

    /// Serialize all items as a JSON array, in list order.
    ///
    /// An empty list serializes to `"[]"`.
    fn serialize(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.list()?)?)
    }

    /// Check if an item exists.
    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.get(name)?.is_some())
    }
}

/// Blanket implementation of GroceryStore for Arc-wrapped stores.
///
/// This allows using `Arc<T>` where `T: GroceryStore` is expected, which is
/// useful for sharing stores between tests and the facade.
impl<T: GroceryStore + ?Sized> GroceryStore for Arc<T> {
    fn get(&self, name: &str) -> Result<Option<GroceryItem>> {
        (**self).get(name)
    }

    fn add(&self, item: &GroceryItem) -> Result<()> {
        (**self).add(item)
    }

    fn delete(&self, name: &str) -> Result<()> {
        (**self).delete(name)
    }

    fn update(&self, name: &str, update: &FieldUpdate) -> Result<()> {
        (**self).update(name, update)
    }

    fn list(&self) -> Result<Vec<GroceryItem>> {
        (**self).list()
    }
}
