//! File-backed grocery storage.
//!
//! The whole list is persisted as a JSON envelope `{"groceries": [...]}` and
//! rewritten on every mutation. Writes go through a temp file + atomic rename
//! so a crash mid-write cannot corrupt the persisted list. The backing file
//! is the source of truth: a file that exists but cannot be read or parsed is
//! fatal at construction.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::config::PersistFailurePolicy;
use crate::core::{FieldUpdate, GroceryItem, GroceryList};
use crate::error::{PantryError, Result};
use crate::storage::GroceryStore;

/// Envelope wrapping the item array in the backing file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ListFile {
    groceries: Vec<GroceryItem>,
}

/// File-backed grocery store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: RwLock<GroceryList>,
    policy: PersistFailurePolicy,
}

impl FileStore {
    /// Open a store over the given file, surfacing persistence failures.
    ///
    /// If the file doesn't exist it is initialized with an empty envelope.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_policy(path, PersistFailurePolicy::Propagate)
    }

    /// Open a store with an explicit persistence-failure policy.
    pub fn with_policy(path: impl Into<PathBuf>, policy: PersistFailurePolicy) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| PantryError::storage(parent, e))?;
            }
        }

        let items = if path.exists() {
            let content =
                fs::read_to_string(&path).map_err(|e| PantryError::storage(&path, e))?;
            let file: ListFile = serde_json::from_str(&content)?;
            GroceryList::from(file.groceries)
        } else {
            let store = Self {
                path: path.clone(),
                items: RwLock::new(GroceryList::new()),
                policy,
            };
            store.persist(&GroceryList::new())?;
            return Ok(store);
        };

        Ok(Self {
            path,
            items: RwLock::new(items),
            policy,
        })
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the path for the temp file used during atomic writes.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "groceries.json".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    /// Rewrite the backing file atomically with the full list.
    fn persist(&self, items: &GroceryList) -> Result<()> {
        let envelope = ListFile {
            groceries: items.items().to_vec(),
        };
        let json = serde_json::to_string(&envelope)?;
        let temp_path = self.temp_path();

        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| PantryError::storage(&temp_path, e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| PantryError::storage(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| PantryError::storage(&temp_path, e))?;
        }

        // Rename temp file to final path (atomic on POSIX)
        fs::rename(&temp_path, &self.path).map_err(|e| PantryError::storage(&self.path, e))?;

        Ok(())
    }

    /// Commit a mutated list: persist first, then swap in memory.
    ///
    /// Under `Propagate`, a failed write leaves the in-memory list unchanged
    /// so memory never runs ahead of disk. Under `Log`, the write failure is
    /// logged and the in-memory mutation is kept (best-effort persistence).
    fn commit(&self, next: GroceryList) -> Result<()> {
        match self.persist(&next) {
            Ok(()) => {}
            Err(err) => match self.policy {
                PersistFailurePolicy::Propagate => return Err(err),
                PersistFailurePolicy::Log => {
                    tracing::warn!("failed to persist grocery list: {}", err);
                }
            },
        }
        *self.items.write().unwrap() = next;
        Ok(())
    }
}

impl GroceryStore for FileStore {
    fn get(&self, name: &str) -> Result<Option<GroceryItem>> {
        Ok(self.items.read().unwrap().get(name).cloned())
    }

    fn add(&self, item: &GroceryItem) -> Result<()> {
        let mut next = self.items.read().unwrap().clone();
        next.add(item.clone());
        self.commit(next)
    }

    fn delete(&self, name: &str) -> Result<()> {
        let mut next = self.items.read().unwrap().clone();
        if !next.remove(name) {
            return Ok(());
        }
        self.commit(next)
    }

    fn update(&self, name: &str, update: &FieldUpdate) -> Result<()> {
        let mut next = self.items.read().unwrap().clone();
        next.apply_update(name, update)?;
        self.commit(next)
    }

    fn list(&self) -> Result<Vec<GroceryItem>> {
        Ok(self.items.read().unwrap().items().to_vec())
    }
}
