use std::sync::Arc;

use crate::core::{DriveError, Result};
use crate::store::{self, DocumentStore, FAVORITES_KEY};

/// Persisted set of favorite content identifiers, in insertion order
pub struct Favorites {
    items: Vec<String>,
    store: Arc<dyn DocumentStore>,
    /// Why the stored document could not be read; writes are refused while set
    load_error: Option<String>,
}

impl Favorites {
    pub fn open(store: Arc<dyn DocumentStore>) -> Result<Self> {
        let mut items: Vec<String> =
            store::load_document(store.as_ref(), FAVORITES_KEY)?.unwrap_or_default();
        let mut seen = std::collections::HashSet::new();
        items.retain(|item| seen.insert(item.clone()));

        Ok(Self {
            items,
            store,
            load_error: None,
        })
    }

    /// Load favorites, or start empty in memory when the stored document
    /// cannot be read. The unreadable document is left untouched on disk.
    pub fn open_or_empty(store: Arc<dyn DocumentStore>) -> Self {
        match Self::open(store.clone()) {
            Ok(favorites) => favorites,
            Err(e) => {
                log::warn!("Favorites unavailable, keeping them in memory only: {}", e);
                Self {
                    items: Vec::new(),
                    store,
                    load_error: Some(e.to_string()),
                }
            }
        }
    }

    /// Set when the stored favorites could not be loaded
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Add a favorite; returns false if it was already present
    pub fn add(&mut self, content_id: &str) -> Result<bool> {
        let content_id = content_id.trim();
        if self.contains(content_id) {
            return Ok(false);
        }
        self.items.push(content_id.to_string());
        self.persist()?;
        Ok(true)
    }

    /// Remove a favorite; returns false if it was not present
    pub fn remove(&mut self, content_id: &str) -> Result<bool> {
        let content_id = content_id.trim();
        let before = self.items.len();
        self.items.retain(|item| item != content_id);
        if self.items.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Flip membership and return the new state
    pub fn toggle(&mut self, content_id: &str) -> Result<bool> {
        if self.contains(content_id.trim()) {
            self.remove(content_id)?;
            Ok(false)
        } else {
            self.add(content_id)?;
            Ok(true)
        }
    }

    pub fn contains(&self, content_id: &str) -> bool {
        self.items.iter().any(|item| item == content_id)
    }

    pub fn list(&self) -> &[String] {
        &self.items
    }

    fn persist(&self) -> Result<()> {
        if let Some(err) = &self.load_error {
            return Err(DriveError::Persistence(format!(
                "{} not saved because the stored copy could not be read: {}",
                FAVORITES_KEY, err
            )));
        }
        store::save_document(self.store.as_ref(), FAVORITES_KEY, &self.items)
    }
}
