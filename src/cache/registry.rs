//! Provider Registry Module
//!
//! Process-wide name-to-constructor table enabling string-based backend
//! construction and third-party provider registration.

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::cache::{BoundedCache, Cache, FileCache, MemoryCache};
use crate::error::{CacheError, Result};

// == Provider Names ==
/// Built-in in-memory provider with background sweeping.
pub const MEMORY_PROVIDER: &str = "memory";
/// Built-in bounded provider with LRU/ARC eviction.
pub const GCACHE_PROVIDER: &str = "gcache";
/// Built-in persistent file-tree provider.
pub const FILE_PROVIDER: &str = "file";

/// Constructor signature every provider registers: JSON config in, boxed
/// cache out.
pub type ProviderCtor = fn(&str) -> Result<Box<dyn Cache>>;

// == Registry ==
/// Init-once table seeded with the built-ins; read-mostly afterwards.
static REGISTRY: OnceLock<RwLock<HashMap<String, ProviderCtor>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<String, ProviderCtor>> {
    REGISTRY.get_or_init(|| {
        let mut table: HashMap<String, ProviderCtor> = HashMap::new();
        table.insert(MEMORY_PROVIDER.to_string(), |config| {
            Ok(Box::new(MemoryCache::from_config(config)?))
        });
        table.insert(GCACHE_PROVIDER.to_string(), |config| {
            Ok(Box::new(BoundedCache::from_config(config)?))
        });
        table.insert(FILE_PROVIDER.to_string(), |config| {
            Ok(Box::new(FileCache::from_config(config)?))
        });
        RwLock::new(table)
    })
}

// == Construction ==
/// Instantiates a registered backend from its name and a JSON config
/// string.
///
/// ```no_run
/// # use kvcache::new_cache;
/// let cache = new_cache("memory", r#"{"interval":20}"#).unwrap();
/// ```
pub fn new_cache(provider: &str, config: &str) -> Result<Box<dyn Cache>> {
    let ctor = {
        let table = registry().read().unwrap_or_else(PoisonError::into_inner);
        table
            .get(provider)
            .copied()
            .ok_or_else(|| CacheError::UnknownProvider(provider.to_string()))?
    };
    ctor(config)
}

// == Extension Point ==
/// Registers an additional provider under `name`.
///
/// Intended to run during process startup, before the first `new_cache`
/// call for that name. Registering an already-taken name (including the
/// built-ins) is an error; the registry has no teardown.
pub fn register_provider(name: &str, ctor: ProviderCtor) -> Result<()> {
    let mut table = registry().write().unwrap_or_else(PoisonError::into_inner);
    if table.contains_key(name) {
        return Err(CacheError::DuplicateProvider(name.to_string()));
    }
    table.insert(name.to_string(), ctor);
    Ok(())
}
