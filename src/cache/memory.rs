//! Memory Provider Module
//!
//! In-process map-backed cache with per-key expiry and a background sweep.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde::Deserialize;

use crate::cache::{Cache, CacheEntry, CacheValue};
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_sweep_task, Sweeper};

/// Shared entry table; the sweep thread holds a second reference.
type EntryMap = Arc<RwLock<HashMap<String, CacheEntry>>>;

// == Memory Config ==
/// Configuration payload for the memory provider.
#[derive(Debug, Deserialize)]
struct MemoryConfig {
    /// Sweep period in seconds
    interval: u64,
}

// == Memory Cache ==
/// Unbounded in-memory cache with TTL expiry.
///
/// Entries past their TTL are treated as absent on read immediately and
/// physically removed by a background sweep every `interval` seconds. The
/// sweep thread stops when the cache is dropped.
#[derive(Debug)]
pub struct MemoryCache {
    entries: EntryMap,
    _sweeper: Sweeper,
}

impl MemoryCache {
    // == Constructor ==
    /// Builds a memory cache from a JSON config such as `{"interval":20}`
    /// and starts its sweep task.
    pub fn from_config(config: &str) -> Result<Self> {
        let config: MemoryConfig = serde_json::from_str(config)
            .map_err(|e| CacheError::Config(format!("memory provider: {e}")))?;
        if config.interval == 0 {
            return Err(CacheError::Config(
                "memory provider: interval must be at least 1 second".to_string(),
            ));
        }

        let entries: EntryMap = Arc::new(RwLock::new(HashMap::new()));

        let sweep_entries = Arc::clone(&entries);
        let sweeper = spawn_sweep_task(Duration::from_secs(config.interval), move || {
            sweep_expired(&sweep_entries)
        });

        Ok(Self {
            entries,
            _sweeper: sweeper,
        })
    }

    /// Read-locks the entry table, recovering from lock poisoning.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write-locks the entry table, recovering from lock poisoning.
    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Removes all expired entries, returning the count removed.
fn sweep_expired(entries: &EntryMap) -> usize {
    let mut map = entries.write().unwrap_or_else(PoisonError::into_inner);
    let before = map.len();
    map.retain(|_, entry| !entry.is_expired());
    before - map.len()
}

impl Cache for MemoryCache {
    fn put(&self, key: &str, value: CacheValue, ttl: Duration) -> Result<()> {
        self.write()
            .insert(key.to_string(), CacheEntry::new(value, ttl));
        Ok(())
    }

    fn get(&self, key: &str) -> Option<CacheValue> {
        // Lazy expiry: an entry the sweep has not reached yet is still
        // invisible. Physical removal is left to the sweep.
        let map = self.read();
        map.get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    fn is_exist(&self, key: &str) -> bool {
        self.read()
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    fn incr(&self, key: &str) -> Result<()> {
        // Single write lock covers read-modify-write, so concurrent
        // increments cannot lose updates.
        let mut map = self.write();
        let entry = map
            .get_mut(key)
            .filter(|entry| !entry.is_expired())
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        let adjusted = entry.value.incremented(key)?;
        entry.replace_value(adjusted);
        Ok(())
    }

    fn decr(&self, key: &str) -> Result<()> {
        let mut map = self.write();
        let entry = map
            .get_mut(key)
            .filter(|entry| !entry.is_expired())
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        let adjusted = entry.value.decremented(key)?;
        entry.replace_value(adjusted);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.write().remove(key);
        Ok(())
    }

    fn clear_all(&self) -> Result<()> {
        self.write().clear();
        Ok(())
    }
}
