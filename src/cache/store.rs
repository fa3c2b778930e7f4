//! Durable Cache Store Module
//!
//! Generic in-memory key-value table with a dirty flag and explicit
//! flush to a backing [`Storage`]. Reads and writes are pure memory
//! operations and cannot fail; only `flush`/`clear`/`load` touch the
//! backing store.
//!
//! Durability is at-least-once: a mutation followed by a crash before
//! the next flush is lost. The flush task retries on failure because a
//! failed flush leaves the dirty flag set.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::cache::CacheEntry;
use crate::error::Result;
use crate::storage::Storage;

// == Durable Cache ==
/// In-memory key-value table persisted as one serialized blob.
pub struct DurableCache<T> {
    /// Instance name, used in logs
    name: String,
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Set on every mutation, cleared on successful flush
    dirty: bool,
    /// Backing blob slot
    storage: Box<dyn Storage>,
}

impl<T> DurableCache<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    // == Constructor (empty) ==
    /// Creates an empty cache without consulting the backing store.
    pub fn new(name: impl Into<String>, storage: Box<dyn Storage>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
            dirty: false,
            storage,
        }
    }

    // == Constructor (load) ==
    /// Creates a cache populated from the backing store.
    ///
    /// A missing blob starts empty. A load or decode failure also starts
    /// empty: availability is preferred over continuity, and the failure
    /// is logged as a warning rather than propagated.
    pub async fn load(name: impl Into<String>, storage: Box<dyn Storage>) -> Self {
        let name = name.into();
        let entries = match storage.load().await {
            Ok(Some(bytes)) => {
                match serde_json::from_slice::<Vec<(String, CacheEntry<T>)>>(&bytes) {
                    Ok(pairs) => {
                        info!("Loaded {} entries into '{}' cache", pairs.len(), name);
                        pairs.into_iter().collect()
                    }
                    Err(e) => {
                        warn!("Failed to decode '{}' cache, starting empty: {}", name, e);
                        HashMap::new()
                    }
                }
            }
            Ok(None) => HashMap::new(),
            Err(e) => {
                warn!("Failed to load '{}' cache, starting empty: {}", name, e);
                HashMap::new()
            }
        };

        Self {
            name,
            entries,
            dirty: false,
            storage,
        }
    }

    // == Get ==
    /// Returns a clone of the value for `key`, never touching the backing store.
    pub fn get(&self, key: &str) -> Option<T> {
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Inserts or overwrites the entry for `key` and marks the table dirty.
    pub fn set(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), CacheEntry::new(value));
        self.dirty = true;
    }

    // == Delete ==
    /// Removes the entry for `key`. Marks the table dirty only if an
    /// entry was actually removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.dirty = true;
        }
        removed
    }

    // == Get All ==
    /// Snapshot of the current contents, used by sweep operations.
    pub fn get_all(&self) -> Vec<(String, T)> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }

    // == Clear ==
    /// Empties the table and immediately flushes the empty state.
    pub async fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.dirty = true;
        self.flush().await
    }

    // == Flush ==
    /// Serializes the full table and overwrites the backing store.
    ///
    /// The encoding is key-sorted, so flushing unchanged state twice
    /// produces byte-identical blobs. The dirty flag is cleared only
    /// after the save succeeded.
    pub async fn flush(&mut self) -> Result<()> {
        let bytes = self.encode()?;
        self.storage.save(&bytes).await?;
        self.dirty = false;
        Ok(())
    }

    /// Flushes only if the table is dirty. Returns whether a flush ran.
    pub async fn flush_if_dirty(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.flush().await?;
        Ok(true)
    }

    // == Encode ==
    /// Serializes the table as key-sorted `[key, entry]` pairs.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut pairs: Vec<(&String, &CacheEntry<T>)> = self.entries.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        Ok(serde_json::to_vec(&pairs)?)
    }

    // == Accessors ==
    /// Returns the instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if in-memory state has diverged from the last flush.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
