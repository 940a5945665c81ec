//! In-memory grocery storage.
//!
//! State lives only for the process lifetime. Thread-safe via
//! `RwLock<GroceryList>`; also the backing store for tests.

use std::sync::RwLock;

use crate::core::{FieldUpdate, GroceryItem, GroceryList};
use crate::error::Result;
use crate::storage::GroceryStore;

/// In-memory grocery store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<GroceryList>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items in the store.
    pub fn len(&self) -> usize {
        self.items.read().unwrap().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.items.read().unwrap().is_empty()
    }
}

impl GroceryStore for MemoryStore {
    fn get(&self, name: &str) -> Result<Option<GroceryItem>> {
        Ok(self.items.read().unwrap().get(name).cloned())
    }

    fn add(&self, item: &GroceryItem) -> Result<()> {
        self.items.write().unwrap().add(item.clone());
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        self.items.write().unwrap().remove(name);
        Ok(())
    }

    fn update(&self, name: &str, update: &FieldUpdate) -> Result<()> {
        self.items.write().unwrap().apply_update(name, update)
    }

    fn list(&self) -> Result<Vec<GroceryItem>> {
        Ok(self.items.read().unwrap().items().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::tests::test_grocery_store_crud;

    #[test]
    fn test_memory_store_crud() {
        let store = MemoryStore::new();
        test_grocery_store_crud(&store);
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let store = MemoryStore::new();
        store.add(&GroceryItem::new("apple", 2, 1.88)).unwrap();
        store.add(&GroceryItem::new("mango", 5, 4.20)).unwrap();
        store.add(&GroceryItem::new("orange", 1, 0.69)).unwrap();

        assert_eq!(store.len(), 3);
        let names: Vec<String> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(names, vec!["apple", "mango", "orange"]);
    }

    #[test]
    fn test_serialize_round_trip() {
        let store = MemoryStore::new();
        store.add(&GroceryItem::new("apple", 2, 1.88)).unwrap();

        assert_eq!(
            store.serialize().unwrap(),
            r#"[{"name":"apple","quantity":2,"price":1.88,"purchased":false}]"#
        );
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemoryStore::new());
        let mut handles = vec![];

        for i in 0..10 {
            let store_clone = Arc::clone(&store);
            let handle = thread::spawn(move || {
                let name = format!("item{}", i);
                store_clone.add(&GroceryItem::new(&name, 1, 1.0)).unwrap();
                store_clone.get(&name).unwrap();
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 10);
    }
}
