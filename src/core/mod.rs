//! Core domain types and validation for Pantry.

pub mod item;
pub mod validate;

pub use item::{FieldUpdate, GroceryItem, GroceryList, ItemField, ITEM_FIELDS};
pub use validate::{is_valid_name, validate_create, validate_update};
