//! Durable key-value storage and the journal adapter over it
//!
//! The store has local-storage semantics: string keys, string values,
//! whole-value replacement on write.

use crate::db::DbError;
use crate::session::JournalEntry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Key under which the journal snapshot is stored
pub const JOURNAL_KEY: &str = "journal";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// String key-value storage
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace any prior value under `key`
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }
}

/// In-process store; counts writes so callers can assert on them
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set_item` calls
    #[allow(dead_code)] // Used in tests
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let items = self.items.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = self.items.lock().map_err(|_| StoreError::LockPoisoned)?;
        items.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Loads and saves the journal as one JSON array under [`JOURNAL_KEY`]
pub struct JournalStore<S> {
    store: S,
}

impl<S: KeyValueStore> JournalStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read the saved journal. A missing, unreadable or malformed value
    /// yields an empty journal.
    pub fn load(&self) -> Vec<JournalEntry> {
        let raw = match self.store.get_item(JOURNAL_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read journal, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Option<Vec<JournalEntry>>>(&raw) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Malformed journal data, starting empty");
                Vec::new()
            }
        }
    }

    /// Write the full snapshot, replacing the previous one
    pub fn save(&self, entries: &[JournalEntry]) -> Result<(), StoreError> {
        let json = serde_json::to_string(entries)?;
        self.store.set_item(JOURNAL_KEY, &json)
    }
}
