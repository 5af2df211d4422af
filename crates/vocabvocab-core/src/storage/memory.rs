//! In-process key/value store.
//!
//! Same contract as [`Database`](super::Database) without touching disk.
//! Writes can be switched off, and reads of chosen keys made to fail, to
//! exercise the recovery paths.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use super::KvStore;
use crate::error::StorageError;

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    reject_writes: Cell<bool>,
    failing_reads: RefCell<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with raw key/value pairs.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        store.entries.borrow_mut().extend(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into())),
        );
        store
    }

    /// When `true`, every `set` fails with [`StorageError::WriteRejected`].
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    /// Make every `get` of `key` fail with [`StorageError::ReadFailed`].
    pub fn fail_reads_of(&self, key: &str) {
        self.failing_reads.borrow_mut().insert(key.to_string());
    }

    /// Raw stored value, bypassing the trait.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Copy of everything stored so far.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.failing_reads.borrow().contains(key) {
            return Err(StorageError::ReadFailed {
                key: key.to_string(),
                message: "read failure".to_string(),
            });
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_many(&[(key, value.to_string())])
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        if self.reject_writes.get() {
            let key = entries.first().map(|(k, _)| *k).unwrap_or_default();
            return Err(StorageError::WriteRejected {
                key: key.to_string(),
                message: "store is read-only".to_string(),
            });
        }
        self.entries.borrow_mut().extend(
            entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone())),
        );
        Ok(())
    }
}
