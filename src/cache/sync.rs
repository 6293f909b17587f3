//! Synchronizer Module
//!
//! Composes two caches into a write-through, read-populate two-tier
//! cache: a fast primary over a larger or persistent secondary.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::cache::{Cache, CacheValue};
use crate::error::{CacheError, Result};

// == Synchronizer ==
/// Two-tier cache coordination policy.
///
/// The primary tier is authoritative on the hot path: reads check it
/// first and a secondary hit is promoted back into it. The tiers keep
/// independent expiry, so a short-lived hot tier can sit over a
/// long-lived backing store. The synchronizer holds no storage of its
/// own.
pub struct Synchronizer {
    primary: Arc<dyn Cache>,
    secondary: Arc<dyn Cache>,
}

impl Synchronizer {
    // == Constructor ==
    /// Composes a fast `primary` cache with a backing `secondary` one.
    pub fn new(primary: Arc<dyn Cache>, secondary: Arc<dyn Cache>) -> Self {
        Self { primary, secondary }
    }

    // == Put ==
    /// Writes through to both tiers.
    ///
    /// A secondary failure is surfaced, but the primary write stands:
    /// caching is best-effort, not transactional.
    pub fn put(&self, key: &str, value: CacheValue, ttl: Duration) -> Result<()> {
        self.primary.put(key, value.clone(), ttl)?;
        self.secondary.put(key, value, ttl)
    }

    // == Get ==
    /// Reads from the primary tier, falling back to the secondary.
    ///
    /// A secondary hit is promoted into the primary with the given `ttl`
    /// so subsequent reads hit the fast tier. Promotion failures are
    /// logged, never surfaced; concurrent identical misses may each
    /// promote (last write wins).
    pub fn get(&self, key: &str, ttl: Duration) -> Option<CacheValue> {
        if let Some(value) = self.primary.get(key) {
            return Some(value);
        }

        let value = self.secondary.get(key)?;
        if let Err(e) = self.primary.put(key, value.clone(), ttl) {
            warn!(key, error = %e, "failed to promote entry into primary tier");
        }
        Some(value)
    }

    // == Is Exist ==
    /// True if either tier holds a live entry; primary checked first.
    pub fn is_exist(&self, key: &str) -> bool {
        self.primary.is_exist(key) || self.secondary.is_exist(key)
    }

    // == Delete ==
    /// Removes the key from both tiers.
    ///
    /// Both deletions are always attempted; failures are collected and
    /// reported together rather than short-circuiting.
    pub fn delete(&self, key: &str) -> Result<()> {
        let mut failures = Vec::new();

        for (tier, cache) in [("primary", &self.primary), ("secondary", &self.secondary)] {
            if let Err(e) = cache.delete(key) {
                warn!(key, tier, error = %e, "tier delete failed");
                failures.push(e);
            }
        }

        match failures.len() {
            0 => Ok(()),
            1 => Err(failures.remove(0)),
            _ => Err(CacheError::Multi(failures)),
        }
    }
}
