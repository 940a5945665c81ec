//! Storage backends for grocery lists.
//!
//! Three interchangeable backends sit behind [`GroceryStore`]: process-local
//! memory, a JSON file, and a remote table service. Which one runs is a
//! configuration decision; everything above the trait is backend-agnostic.

pub mod file;
pub mod memory;
pub mod remote;
pub mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use remote::RemoteStore;
pub use traits::GroceryStore;

use crate::config::{StorageConfig, StorageKind};
use crate::error::Result;

/// Build the store selected by configuration.
pub fn open_store(config: &StorageConfig) -> Result<Box<dyn GroceryStore>> {
    let store: Box<dyn GroceryStore> = match config.backend {
        StorageKind::Memory => Box::new(MemoryStore::new()),
        StorageKind::File => Box::new(FileStore::with_policy(
            &config.file_path,
            config.on_persist_failure,
        )?),
        StorageKind::Remote => Box::new(RemoteStore::with_policy(
            &config.remote,
            config.on_persist_failure,
        )?),
    };
    Ok(store)
}
