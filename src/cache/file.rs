//! File Provider Module
//!
//! Persistent disk-backed cache sharding entries across hashed
//! subdirectories, with optional expiry metadata embedded per record.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::warn;

use crate::cache::entry::{current_timestamp_ms, saturating_ms};
use crate::cache::{Cache, CacheValue};
use crate::error::{CacheError, Result};

/// Deepest supported fan-out; SHA-256 hex yields 32 two-char segments.
const MAX_DIRECTORY_LEVEL: usize = 8;

// == File Config ==
/// Configuration payload for the file provider.
///
/// Field names and string-typed numerics follow the wire format of the
/// system this provider is drop-in compatible with, e.g.
/// `{"CachePath":"cache","FileSuffix":".bin","DirectoryLevel":"2","EmbedExpiry":"0"}`.
#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(rename = "CachePath", default = "default_cache_path")]
    cache_path: PathBuf,
    #[serde(rename = "FileSuffix", default = "default_file_suffix")]
    file_suffix: String,
    #[serde(rename = "DirectoryLevel", default = "default_directory_level")]
    directory_level: String,
    #[serde(rename = "EmbedExpiry", default = "default_embed_expiry")]
    embed_expiry: String,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("cache")
}

fn default_file_suffix() -> String {
    ".bin".to_string()
}

fn default_directory_level() -> String {
    "2".to_string()
}

fn default_embed_expiry() -> String {
    "0".to_string()
}

// == File Record ==
/// On-disk representation of one cache entry.
#[derive(Debug, Serialize, Deserialize)]
struct FileRecord {
    value: CacheValue,
    /// Expiry deadline (Unix ms); only populated when EmbedExpiry is on
    expires_at: Option<u64>,
}

impl FileRecord {
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }
}

// == File Cache ==
/// Persistent cache mapping each key to one file under a hashed
/// directory tree.
///
/// Writes go through a temp file in the target directory followed by a
/// rename, so readers in other processes never observe partial records.
/// Read-modify-write operations (incr/decr) are serialized per instance.
#[derive(Debug)]
pub struct FileCache {
    cache_path: PathBuf,
    file_suffix: String,
    directory_level: usize,
    embed_expiry: bool,
    /// Serializes incr/decr read-modify-write cycles within this process
    rmw_lock: Mutex<()>,
}

impl FileCache {
    // == Constructor ==
    /// Builds a file cache from a JSON config and creates the root
    /// directory if needed.
    pub fn from_config(config: &str) -> Result<Self> {
        let config: FileConfig = serde_json::from_str(config)
            .map_err(|e| CacheError::Config(format!("file provider: {e}")))?;

        let directory_level: usize = config.directory_level.parse().map_err(|_| {
            CacheError::Config(format!(
                "file provider: DirectoryLevel must be an integer, got '{}'",
                config.directory_level
            ))
        })?;
        if directory_level > MAX_DIRECTORY_LEVEL {
            return Err(CacheError::Config(format!(
                "file provider: DirectoryLevel must be at most {MAX_DIRECTORY_LEVEL}"
            )));
        }

        let embed_expiry = match config.embed_expiry.as_str() {
            "0" => false,
            "1" => true,
            other => {
                return Err(CacheError::Config(format!(
                    "file provider: EmbedExpiry must be \"0\" or \"1\", got '{other}'"
                )))
            }
        };

        fs::create_dir_all(&config.cache_path).map_err(|e| CacheError::Io {
            path: config.cache_path.clone(),
            source: e,
        })?;

        Ok(Self {
            cache_path: config.cache_path,
            file_suffix: config.file_suffix,
            directory_level,
            embed_expiry,
            rmw_lock: Mutex::new(()),
        })
    }

    // == Path Mapping ==
    /// Deterministically maps a key to its file path.
    ///
    /// The key's SHA-256 hex digest supplies `directory_level` two-char
    /// nested directory segments and the leaf file name, bounding the
    /// entry count per directory. SHA-256 keeps the layout stable across
    /// processes and platforms.
    fn path_for(&self, key: &str) -> PathBuf {
        let digest = hex::encode(Sha256::digest(key.as_bytes()));

        let mut path = self.cache_path.clone();
        for level in 0..self.directory_level {
            path.push(&digest[level * 2..level * 2 + 2]);
        }
        path.push(format!("{digest}{}", self.file_suffix));
        path
    }

    /// Atomically writes a record: temp file in the leaf directory, then
    /// rename over the final path.
    fn write_record(&self, path: &Path, record: &FileRecord) -> Result<()> {
        let io_err = |e: io::Error| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        let parent = path.parent().unwrap_or(&self.cache_path);
        fs::create_dir_all(parent).map_err(io_err)?;

        let bytes = serde_json::to_vec(record)
            .map_err(|e| io_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(io_err)?;
        tmp.write_all(&bytes).map_err(io_err)?;
        tmp.persist(path)
            .map_err(|e| io_err(e.error))
            .map(|_| ())
    }

    /// Reads and validates the record for a key.
    ///
    /// Missing files are plain absence. Unreadable or corrupt records are
    /// logged and reported as absence; an expired record is removed
    /// best-effort.
    fn read_record(&self, key: &str) -> Option<FileRecord> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(key, path = %path.display(), error = %e, "failed to read cache file");
                return None;
            }
        };

        let record: FileRecord = match serde_json::from_slice(&bytes) {
            Ok(record) => record,
            Err(e) => {
                warn!(key, path = %path.display(), error = %e, "corrupt cache record");
                return None;
            }
        };

        if record.is_expired() {
            let _ = fs::remove_file(&path);
            return None;
        }
        Some(record)
    }
}

impl Cache for FileCache {
    fn put(&self, key: &str, value: CacheValue, ttl: Duration) -> Result<()> {
        let expires_at = if self.embed_expiry && !ttl.is_zero() {
            Some(current_timestamp_ms().saturating_add(saturating_ms(ttl)))
        } else {
            None
        };
        let record = FileRecord { value, expires_at };
        self.write_record(&self.path_for(key), &record)
    }

    fn get(&self, key: &str) -> Option<CacheValue> {
        self.read_record(key).map(|record| record.value)
    }

    fn is_exist(&self, key: &str) -> bool {
        self.read_record(key).is_some()
    }

    fn incr(&self, key: &str) -> Result<()> {
        let _guard = self.rmw_lock.lock().unwrap_or_else(|e| e.into_inner());
        let record = self
            .read_record(key)
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        let adjusted = FileRecord {
            value: record.value.incremented(key)?,
            expires_at: record.expires_at,
        };
        self.write_record(&self.path_for(key), &adjusted)
    }

    fn decr(&self, key: &str) -> Result<()> {
        let _guard = self.rmw_lock.lock().unwrap_or_else(|e| e.into_inner());
        let record = self
            .read_record(key)
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        let adjusted = FileRecord {
            value: record.value.decremented(key)?,
            expires_at: record.expires_at,
        };
        self.write_record(&self.path_for(key), &adjusted)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io { path, source: e }),
        }
    }

    fn clear_all(&self) -> Result<()> {
        let io_err = |e: io::Error| CacheError::Io {
            path: self.cache_path.clone(),
            source: e,
        };
        match fs::remove_dir_all(&self.cache_path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(io_err(e)),
        }
        fs::create_dir_all(&self.cache_path).map_err(io_err)
    }
}
