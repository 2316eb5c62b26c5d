//! Append-only personal journal, persisted on every change

use super::JournalEntry;
use crate::store::{JournalStore, KeyValueStore};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JournalError {
    #[error("Journal entry is empty")]
    EmptyInput,
}

pub struct Journal<S> {
    entries: Vec<JournalEntry>,
    store: JournalStore<S>,
}

impl<S: KeyValueStore> Journal<S> {
    /// Load saved entries; never fails
    pub fn load(store: JournalStore<S>) -> Self {
        let entries = store.load();
        tracing::info!(entries = entries.len(), "Journal loaded");
        Self { entries, store }
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Append an entry and write the full snapshot.
    ///
    /// A failed write is logged; the entry stays in memory and the next
    /// successful save will include it.
    pub fn save_entry(&mut self, text: &str) -> Result<&JournalEntry, JournalError> {
        if text.trim().is_empty() {
            return Err(JournalError::EmptyInput);
        }

        self.entries.push(JournalEntry::new(text));
        if let Err(e) = self.store.save(&self.entries) {
            tracing::error!(error = %e, entries = self.entries.len(), "Failed to persist journal");
        }

        Ok(&self.entries[self.entries.len() - 1])
    }
}
