// src/storage/mod.rs
//! Slot storage and the blog lifecycle store built on top of it.
//!
//! A [`Storage`] backend holds named string slots. [`BlogStore`] keeps the
//! canonical collection of posts in memory and rewrites its slot after every
//! mutation.

mod blog_store;
mod file_storage;

use std::collections::HashMap;

use crate::Result;

pub use blog_store::{
    BlogStore, Clock, LoadReport, StoreOptions, DEFAULT_STORAGE_KEY, TRASH_RETENTION_DAYS,
};
pub use file_storage::{FileStorage, BLOGDESK_DIR};

/// A key-value store of whole-string slots.
pub trait Storage {
    /// Read a slot. `Ok(None)` means the slot has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace a slot's contents.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process storage, mostly for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut slots = HashMap::new();
        slots.insert(key.into(), value.into());
        Self { slots }
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_missing_slot() {
        let storage = MemoryStorage::new();
        assert!(storage.get("blog_data").unwrap().is_none());
    }

    #[test]
    fn test_memory_storage_overwrites_slot() {
        let mut storage = MemoryStorage::with_slot("blog_data", "[]");
        storage.set("blog_data", "[1]").unwrap();
        assert_eq!(storage.get("blog_data").unwrap().as_deref(), Some("[1]"));
    }
}
