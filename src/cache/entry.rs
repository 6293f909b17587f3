//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::cache::CacheValue;

// == Cache Entry ==
/// A stored value plus its lifetime metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub value: CacheValue,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now.
    ///
    /// A TTL of `Duration::ZERO` produces an entry that never expires.
    pub fn new(value: CacheValue, ttl: Duration) -> Self {
        let now = current_timestamp_ms();
        let expires_at = if ttl.is_zero() {
            None
        } else {
            Some(now.saturating_add(saturating_ms(ttl)))
        };

        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry with a deadline is expired once the current time reaches
    /// it; an entry without a deadline never expires.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    /// Replaces the payload, keeping the entry's expiry clock untouched.
    ///
    /// Used by incr/decr, which adjust the value without extending its
    /// lifetime.
    pub fn replace_value(&mut self, value: CacheValue) {
        self.value = value;
    }
}

// == Utility Functions ==
/// Converts a duration to whole milliseconds, clamping at `u64::MAX` so
/// an absurd TTL degrades to "effectively never expires".
pub fn saturating_ms(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}

/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
