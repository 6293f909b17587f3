//! Bounded Provider Module
//!
//! Capacity-limited cache combining a HashMap entry table with a pluggable
//! eviction tracker (LRU or ARC) and per-key TTL.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde::Deserialize;

use crate::cache::policy::{tracker_for, EvictionTracker};
use crate::cache::{Cache, CacheEntry, CacheValue};
use crate::error::{CacheError, Result};

// == Bounded Config ==
/// Configuration payload for the bounded provider.
#[derive(Debug, Deserialize)]
struct BoundedConfig {
    /// Maximum number of resident entries
    size: usize,
    /// Eviction policy identifier ("lru" or "arc")
    #[serde(rename = "type")]
    policy: String,
}

// == Bounded Cache ==
/// Bounded cache with policy-driven eviction and TTL expiry.
///
/// Capacity eviction and TTL expiry are independent: whichever fires first
/// removes the entry. Entries found expired on read are removed from both
/// the table and the tracker.
#[derive(Debug)]
pub struct BoundedCache {
    inner: RwLock<BoundedInner>,
}

#[derive(Debug)]
struct BoundedInner {
    entries: HashMap<String, CacheEntry>,
    tracker: Box<dyn EvictionTracker>,
}

impl BoundedCache {
    // == Constructor ==
    /// Builds a bounded cache from a JSON config such as
    /// `{"size":20,"type":"arc"}`. An unsupported policy name fails here.
    pub fn from_config(config: &str) -> Result<Self> {
        let config: BoundedConfig = serde_json::from_str(config)
            .map_err(|e| CacheError::Config(format!("gcache provider: {e}")))?;
        if config.size == 0 {
            return Err(CacheError::Config(
                "gcache provider: size must be at least 1".to_string(),
            ));
        }
        let tracker = tracker_for(&config.policy, config.size)?;

        Ok(Self {
            inner: RwLock::new(BoundedInner {
                entries: HashMap::new(),
                tracker,
            }),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, BoundedInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BoundedInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Cache for BoundedCache {
    fn put(&self, key: &str, value: CacheValue, ttl: Duration) -> Result<()> {
        let mut inner = self.write();
        inner
            .entries
            .insert(key.to_string(), CacheEntry::new(value, ttl));
        if let Some(victim) = inner.tracker.admit(key) {
            if victim != key {
                inner.entries.remove(&victim);
            }
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Option<CacheValue> {
        // Write lock: a hit moves the key in the tracker and an expired
        // entry is removed on the spot.
        let mut inner = self.write();
        let live_value = match inner.entries.get(key) {
            None => return None,
            Some(entry) if entry.is_expired() => None,
            Some(entry) => Some(entry.value.clone()),
        };
        match live_value {
            Some(value) => {
                inner.tracker.touch(key);
                Some(value)
            }
            None => {
                inner.entries.remove(key);
                inner.tracker.remove(key);
                None
            }
        }
    }

    fn is_exist(&self, key: &str) -> bool {
        // Existence probes do not count as accesses.
        self.read()
            .entries
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    fn incr(&self, key: &str) -> Result<()> {
        let mut inner = self.write();
        let entry = inner
            .entries
            .get_mut(key)
            .filter(|entry| !entry.is_expired())
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        let adjusted = entry.value.incremented(key)?;
        entry.replace_value(adjusted);
        inner.tracker.touch(key);
        Ok(())
    }

    fn decr(&self, key: &str) -> Result<()> {
        let mut inner = self.write();
        let entry = inner
            .entries
            .get_mut(key)
            .filter(|entry| !entry.is_expired())
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        let adjusted = entry.value.decremented(key)?;
        entry.replace_value(adjusted);
        inner.tracker.touch(key);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut inner = self.write();
        inner.entries.remove(key);
        inner.tracker.remove(key);
        Ok(())
    }

    fn clear_all(&self) -> Result<()> {
        let mut inner = self.write();
        inner.entries.clear();
        inner.tracker.clear();
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn lru_cache(size: usize) -> BoundedCache {
        BoundedCache::from_config(&format!(r#"{{"size":{size},"type":"lru"}}"#)).unwrap()
    }

    #[test]
    fn test_from_config_rejects_unknown_policy() {
        let result = BoundedCache::from_config(r#"{"size":20,"type":"fifo"}"#);
        assert!(matches!(result, Err(CacheError::Config(_))));
    }

    #[test]
    fn test_from_config_rejects_zero_size() {
        let result = BoundedCache::from_config(r#"{"size":0,"type":"lru"}"#);
        assert!(matches!(result, Err(CacheError::Config(_))));
    }

    #[test]
    fn test_arc_policy_constructs() {
        assert!(BoundedCache::from_config(r#"{"size":20,"type":"arc"}"#).is_ok());
    }

    #[test]
    fn test_put_get_roundtrip() {
        let cache = lru_cache(20);

        cache
            .put("asana", CacheValue::Int(1), Duration::from_secs(10))
            .unwrap();

        assert!(cache.is_exist("asana"));
        assert_eq!(cache.get("asana"), Some(CacheValue::Int(1)));
    }

    #[test]
    fn test_capacity_eviction() {
        let cache = lru_cache(3);

        for (i, key) in ["k1", "k2", "k3"].iter().enumerate() {
            cache
                .put(key, CacheValue::Int(i as i64), Duration::ZERO)
                .unwrap();
        }
        cache.put("k4", CacheValue::Int(3), Duration::ZERO).unwrap();

        assert!(!cache.is_exist("k1"), "oldest key should be evicted");
        assert!(cache.is_exist("k2"));
        assert!(cache.is_exist("k3"));
        assert!(cache.is_exist("k4"));
    }

    #[test]
    fn test_get_protects_from_eviction() {
        let cache = lru_cache(3);

        cache.put("k1", CacheValue::Int(1), Duration::ZERO).unwrap();
        cache.put("k2", CacheValue::Int(2), Duration::ZERO).unwrap();
        cache.put("k3", CacheValue::Int(3), Duration::ZERO).unwrap();

        cache.get("k1");
        cache.put("k4", CacheValue::Int(4), Duration::ZERO).unwrap();

        assert!(cache.is_exist("k1"), "recently read key should survive");
        assert!(!cache.is_exist("k2"));
    }

    #[test]
    fn test_overwrite_does_not_evict() {
        let cache = lru_cache(2);

        cache.put("a", CacheValue::Int(1), Duration::ZERO).unwrap();
        cache.put("b", CacheValue::Int(2), Duration::ZERO).unwrap();
        cache.put("a", CacheValue::Int(9), Duration::ZERO).unwrap();

        assert!(cache.is_exist("a"));
        assert!(cache.is_exist("b"));
        assert_eq!(cache.get("a"), Some(CacheValue::Int(9)));
    }

    #[test]
    fn test_ttl_expiry_independent_of_capacity() {
        let cache = lru_cache(20);

        cache
            .put("short", CacheValue::Int(1), Duration::from_millis(50))
            .unwrap();
        sleep(Duration::from_millis(80));

        assert_eq!(cache.get("short"), None);
        assert!(!cache.is_exist("short"));
    }

    #[test]
    fn test_expired_entry_frees_capacity() {
        let cache = lru_cache(2);

        cache
            .put("short", CacheValue::Int(1), Duration::from_millis(50))
            .unwrap();
        cache.put("b", CacheValue::Int(2), Duration::ZERO).unwrap();
        sleep(Duration::from_millis(80));

        // Reading the expired key removes it from the tracker too, so the
        // next insert should not evict "b".
        assert_eq!(cache.get("short"), None);
        cache.put("c", CacheValue::Int(3), Duration::ZERO).unwrap();
        assert!(cache.is_exist("b"));
        assert!(cache.is_exist("c"));
    }

    #[test]
    fn test_incr_decr_roundtrip() {
        let cache = BoundedCache::from_config(r#"{"size":20,"type":"arc"}"#).unwrap();

        cache
            .put("asana", CacheValue::Int(1), Duration::from_secs(10))
            .unwrap();
        cache.incr("asana").unwrap();
        assert_eq!(cache.get("asana"), Some(CacheValue::Int(2)));
        cache.decr("asana").unwrap();
        assert_eq!(cache.get("asana"), Some(CacheValue::Int(1)));
    }

    #[test]
    fn test_incr_absent_key_fails() {
        let cache = lru_cache(20);
        assert!(matches!(cache.incr("ghost"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_delete_and_clear() {
        let cache = lru_cache(20);

        cache.put("a", CacheValue::Int(1), Duration::ZERO).unwrap();
        cache.put("b", CacheValue::Int(2), Duration::ZERO).unwrap();

        cache.delete("a").unwrap();
        assert!(!cache.is_exist("a"));
        cache.delete("a").unwrap(); // idempotent

        cache.clear_all().unwrap();
        assert!(!cache.is_exist("b"));
    }

    #[test]
    fn test_get_multi_preserves_order() {
        let cache = lru_cache(20);

        cache
            .put("asana", CacheValue::from("author"), Duration::from_secs(10))
            .unwrap();
        cache
            .put("asana1", CacheValue::from("author1"), Duration::from_secs(10))
            .unwrap();

        let values = cache.get_multi(&["asana", "asana1"]);
        assert_eq!(values[0], Some(CacheValue::from("author")));
        assert_eq!(values[1], Some(CacheValue::from("author1")));
    }

    #[test]
    fn test_concurrent_incr_no_lost_updates() {
        use std::sync::Arc;
        use std::thread;

        let cache = Arc::new(lru_cache(20));
        cache
            .put("counter", CacheValue::Int(0), Duration::from_secs(20))
            .unwrap();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.incr("counter").unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.get("counter"), Some(CacheValue::Int(10)));
    }
}
