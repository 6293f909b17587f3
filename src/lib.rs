//! kvcache - A pluggable key/value cache library
//!
//! Provides a uniform [`Cache`] contract over multiple storage backends
//! (in-memory with TTL sweeping, bounded LRU/ARC, persistent file tree),
//! a process-wide provider registry for string-based construction, and a
//! two-tier [`Synchronizer`] composing a fast cache over a backing one.
//!
//! ```no_run
//! use std::time::Duration;
//! use kvcache::{new_cache, CacheValue};
//!
//! let cache = new_cache("memory", r#"{"interval":20}"#).unwrap();
//! cache.put("counter", CacheValue::Int(1), Duration::from_secs(10)).unwrap();
//! cache.incr("counter").unwrap();
//! assert_eq!(cache.get("counter"), Some(CacheValue::Int(2)));
//! ```

pub mod cache;
pub mod error;
pub mod tasks;

pub use cache::{
    new_cache, register_provider, BoundedCache, Cache, CacheEntry, CacheValue, FileCache,
    MemoryCache, ProviderCtor, Synchronizer, FILE_PROVIDER, GCACHE_PROVIDER, MEMORY_PROVIDER,
};
pub use error::{CacheError, Result};
