//! Error types for the cache library
//!
//! Provides unified error handling using thiserror.

use std::path::PathBuf;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for all cache providers and the registry.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No provider registered under the requested name
    #[error("provider not registered: {0}")]
    UnknownProvider(String),

    /// A provider with this name is already registered
    #[error("provider already registered: {0}")]
    DuplicateProvider(String),

    /// Malformed or invalid provider configuration
    #[error("invalid cache config: {0}")]
    Config(String),

    /// Key not found (only an error for incr/decr; reads report absence as None)
    #[error("key not found: {0}")]
    NotFound(String),

    /// Incr/Decr on a value that is not an integer type
    #[error("value for key '{key}' is not numeric (found {kind})")]
    NotNumeric { key: String, kind: &'static str },

    /// Incr/Decr would overflow or underflow the stored integer
    #[error("numeric overflow adjusting key: {0}")]
    Overflow(String),

    /// File backend I/O failure, with the path involved
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Multiple tier operations failed (synchronizer delete)
    #[error("tiered operation failed: {}", join_errors(.0))]
    Multi(Vec<CacheError>),
}

/// Joins nested error messages for the Multi variant's display.
fn join_errors(errors: &[CacheError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// == Result Type Alias ==
/// Convenience Result type for the cache library.
pub type Result<T> = std::result::Result<T, CacheError>;
