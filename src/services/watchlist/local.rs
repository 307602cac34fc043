use std::sync::Arc;

use crate::{
    db::{read_json, write_json, KeyValueStore, StorageKey},
    error::AppResult,
    models::{MediaKey, MediaType, WatchlistEntry},
};

/// Guest watchlist held in memory and mirrored to on-device storage
///
/// Every mutation rewrites the full sequence under [`StorageKey::Watchlist`].
pub struct LocalWatchlist {
    store: Arc<dyn KeyValueStore>,
    entries: Vec<WatchlistEntry>,
}

impl LocalWatchlist {
    /// Loads the persisted sequence; a missing or corrupt value yields an
    /// empty watchlist
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut entries: Vec<WatchlistEntry> =
            read_json(store.as_ref(), StorageKey::Watchlist).unwrap_or_default();

        // Older sessions may have written duplicates; keep the first of each key
        let mut seen = std::collections::HashSet::new();
        entries.retain(|e| seen.insert(e.key()));

        tracing::debug!(entries = entries.len(), "Local watchlist loaded");

        Self { store, entries }
    }

    fn write(store: &dyn KeyValueStore, entries: &[WatchlistEntry]) -> AppResult<()> {
        write_json(store, StorageKey::Watchlist, &entries)
    }

    /// Persists `entries` and only then makes them current, so a failed write
    /// leaves the list untouched
    fn commit(&mut self, entries: Vec<WatchlistEntry>) -> AppResult<()> {
        Self::write(self.store.as_ref(), &entries)?;
        self.entries = entries;
        Ok(())
    }

    /// Appends the entry unless its natural key is already present, in which
    /// case the stored entry is returned untouched
    pub fn add(&mut self, mut entry: WatchlistEntry) -> AppResult<WatchlistEntry> {
        if let Some(existing) = self.get(&entry.key()) {
            return Ok(existing.clone());
        }

        entry.owner_id = None;
        let mut next = self.entries.clone();
        next.push(entry.clone());
        self.commit(next)?;
        Ok(entry)
    }

    /// Returns whether an entry was removed
    pub fn remove(&mut self, media_id: u64, media_type: MediaType) -> AppResult<bool> {
        let key = MediaKey {
            media_id,
            media_type,
        };
        if !self.contains(&key) {
            return Ok(false);
        }

        let next = self
            .entries
            .iter()
            .filter(|e| e.key() != key)
            .cloned()
            .collect();
        self.commit(next)?;
        Ok(true)
    }

    /// Adds the entry if absent, removes it otherwise. Returns whether the
    /// entry is present afterwards.
    pub fn toggle(&mut self, entry: WatchlistEntry) -> AppResult<bool> {
        if self.contains(&entry.key()) {
            self.remove(entry.media_id, entry.media_type)?;
            Ok(false)
        } else {
            self.add(entry)?;
            Ok(true)
        }
    }

    /// Insertion order
    pub fn list(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn get(&self, key: &MediaKey) -> Option<&WatchlistEntry> {
        self.entries.iter().find(|e| e.key() == *key)
    }

    pub fn contains(&self, key: &MediaKey) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empties the watchlist and persists the empty sequence
    pub fn clear(&mut self) -> AppResult<()> {
        self.commit(Vec::new())
    }

    /// Drops the persisted copy entirely (used once it lives remotely)
    pub fn discard(&mut self) -> AppResult<()> {
        self.store.remove(StorageKey::Watchlist.as_str())?;
        self.entries.clear();
        Ok(())
    }
}
