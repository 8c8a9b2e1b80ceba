//! Remembers which remote owners were queried, most recent first.
//!
//! The history is a convenience for revisiting listings. It never implies
//! that the user has access to an owner's files.

mod favorites;

pub use favorites::Favorites;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{short_address, DriveError, Result};
use crate::store::{self, DocumentStore, HISTORY_KEY};

/// Number of owners remembered unless configured otherwise
pub const DEFAULT_CAPACITY: usize = 10;

/// One remembered owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessHistoryEntry {
    /// Owner address exactly as queried
    pub owner_address: String,
    /// Display nickname
    pub label: String,
    /// When a listing for this owner last succeeded
    pub last_accessed_at: DateTime<Utc>,
    /// Number of files returned by that listing
    pub file_count: usize,
}

impl AccessHistoryEntry {
    /// Whether the label is still the generated default
    pub fn has_default_label(&self) -> bool {
        self.label == short_address(&self.owner_address)
    }
}

/// Bounded, persisted, most-recent-first list of queried owners
pub struct AccessHistory {
    entries: Vec<AccessHistoryEntry>,
    capacity: usize,
    store: Arc<dyn DocumentStore>,
    /// Why the stored document could not be read; writes are refused while set
    load_error: Option<String>,
}

impl AccessHistory {
    /// Load the history from `store`; a missing document yields an empty history
    pub fn open(store: Arc<dyn DocumentStore>, capacity: usize) -> Result<Self> {
        let capacity = capacity.max(1);
        let loaded: Vec<AccessHistoryEntry> =
            store::load_document(store.as_ref(), HISTORY_KEY)?.unwrap_or_default();

        let mut history = Self {
            entries: Vec::with_capacity(loaded.len().min(capacity)),
            capacity,
            store,
            load_error: None,
        };

        // Normalize whatever was on disk: first occurrence wins, cap enforced
        for entry in loaded {
            if history.position(&entry.owner_address).is_none() {
                history.entries.push(entry);
            }
        }
        if history.entries.len() > capacity {
            log::warn!(
                "Persisted history holds {} entries, keeping the {} most recent",
                history.entries.len(),
                capacity
            );
            history.entries.truncate(capacity);
        }

        Ok(history)
    }

    /// Load the history, or start empty in memory when the stored document
    /// cannot be read. The unreadable document is left untouched on disk.
    pub fn open_or_empty(store: Arc<dyn DocumentStore>, capacity: usize) -> Self {
        match Self::open(store.clone(), capacity) {
            Ok(history) => history,
            Err(e) => {
                log::warn!("Access history unavailable, keeping it in memory only: {}", e);
                Self {
                    entries: Vec::new(),
                    capacity: capacity.max(1),
                    store,
                    load_error: Some(e.to_string()),
                }
            }
        }
    }

    /// Set when the stored history could not be loaded
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Record a successful listing fetch for `owner` now
    pub fn record_access(&mut self, owner: &str, file_count: usize) -> Result<()> {
        self.record_access_at(owner, file_count, Utc::now())
    }

    /// Record a successful listing fetch for `owner` at `at`
    pub fn record_access_at(&mut self, owner: &str, file_count: usize, at: DateTime<Utc>) -> Result<()> {
        let owner = owner.trim();

        let entry = match self.position(owner) {
            Some(idx) => {
                let mut entry = self.entries.remove(idx);
                entry.last_accessed_at = at;
                entry.file_count = file_count;
                entry
            }
            None => AccessHistoryEntry {
                owner_address: owner.to_string(),
                label: short_address(owner),
                last_accessed_at: at,
                file_count,
            },
        };
        self.entries.insert(0, entry);

        if self.entries.len() > self.capacity {
            for evicted in self.entries.drain(self.capacity..) {
                log::debug!("Evicting {} from access history", evicted.owner_address);
            }
        }

        self.persist()
    }

    /// Rename an entry; returns false and changes nothing when the owner is absent
    pub fn set_label(&mut self, owner: &str, label: &str) -> Result<bool> {
        let owner = owner.trim();
        let idx = match self.position(owner) {
            Some(idx) => idx,
            None => return Ok(false),
        };

        let label = label.trim();
        self.entries[idx].label = if label.is_empty() {
            short_address(owner)
        } else {
            label.to_string()
        };

        self.persist()?;
        Ok(true)
    }

    /// Forget an owner; forgetting an unknown owner is not an error
    pub fn remove(&mut self, owner: &str) -> Result<()> {
        let owner = owner.trim();
        match self.position(owner) {
            Some(idx) => {
                self.entries.remove(idx);
                self.persist()
            }
            None => Ok(()),
        }
    }

    /// Entries, most recently accessed first
    pub fn list(&self) -> &[AccessHistoryEntry] {
        &self.entries
    }

    pub fn get(&self, owner: &str) -> Option<&AccessHistoryEntry> {
        self.position(owner.trim()).map(|idx| &self.entries[idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn position(&self, owner: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.owner_address == owner)
    }

    fn persist(&self) -> Result<()> {
        if let Some(err) = &self.load_error {
            return Err(DriveError::Persistence(format!(
                "{} not saved because the stored copy could not be read: {}",
                HISTORY_KEY, err
            )));
        }
        store::save_document(self.store.as_ref(), HISTORY_KEY, &self.entries).map_err(|e| {
            log::error!("Failed to persist access history: {}", e);
            e
        })
    }
}
