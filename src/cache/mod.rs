//! Cache Module
//!
//! Defines the uniform `Cache` contract, the built-in providers
//! (memory, bounded LRU/ARC, file), the provider registry, and the
//! two-tier synchronizer.

use std::time::Duration;

use crate::error::Result;

mod bounded;
mod entry;
mod file;
mod memory;
mod policy;
mod registry;
mod sync;
mod value;


// Re-export public types
pub use bounded::BoundedCache;
pub use entry::CacheEntry;
pub use file::FileCache;
pub use memory::MemoryCache;
pub use registry::{
    new_cache, register_provider, ProviderCtor, FILE_PROVIDER, GCACHE_PROVIDER, MEMORY_PROVIDER,
};
pub use sync::Synchronizer;
pub use value::CacheValue;

// == Cache Contract ==
/// Uniform contract every cache backend implements.
///
/// All operations are safe for concurrent invocation against the same
/// instance. `incr`/`decr` are atomic per key: concurrent increments never
/// lose updates.
///
/// Absence is not an error on read paths: `get` returns `None` for a
/// missing or expired key, and `delete` of an absent key succeeds. Only
/// `incr`/`decr` treat a missing key as an error.
pub trait Cache: Send + Sync {
    /// Stores a value under `key` with the given TTL, overwriting any
    /// existing entry and resetting its expiry clock.
    ///
    /// A TTL of `Duration::ZERO` means the entry never expires.
    fn put(&self, key: &str, value: CacheValue, ttl: Duration) -> Result<()>;

    /// Retrieves the value for `key`, or `None` if missing or expired.
    fn get(&self, key: &str) -> Option<CacheValue>;

    /// Retrieves several keys at once.
    ///
    /// The result is positionally aligned with `keys`; each slot carries
    /// single-key `get` semantics independently.
    fn get_multi(&self, keys: &[&str]) -> Vec<Option<CacheValue>> {
        keys.iter().map(|key| self.get(key)).collect()
    }

    /// Returns true iff a live (non-expired) entry exists for `key`.
    fn is_exist(&self, key: &str) -> bool;

    /// Atomically increments the numeric value stored under `key` by one.
    ///
    /// Fails with `NotFound` if the key is absent and `NotNumeric` if the
    /// stored value is not an integer type. The entry's TTL is unchanged.
    fn incr(&self, key: &str) -> Result<()>;

    /// Atomically decrements the numeric value stored under `key` by one.
    ///
    /// Same failure modes as [`Cache::incr`]; decrementing an unsigned
    /// zero fails with `Overflow`.
    fn decr(&self, key: &str) -> Result<()>;

    /// Removes the entry for `key`. Deleting an absent key is a no-op
    /// success.
    fn delete(&self, key: &str) -> Result<()>;

    /// Removes every entry from the cache.
    fn clear_all(&self) -> Result<()>;
}
