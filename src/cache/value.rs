//! Cache Value Module
//!
//! Tagged union over the payload types a cache entry may hold.

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

// == Cache Value ==
/// A dynamically typed cache payload.
///
/// Backends store values of any of these variants; only `Int` and `Uint`
/// are eligible for `incr`/`decr`. The enum is serde-serializable so the
/// file backend can persist records to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CacheValue {
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    Uint(u64),
    /// Floating point number
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Opaque byte payload
    Bytes(Vec<u8>),
}

impl CacheValue {
    // == Kind ==
    /// Returns a short name for the variant, used in type-error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            CacheValue::Int(_) => "int",
            CacheValue::Uint(_) => "uint",
            CacheValue::Float(_) => "float",
            CacheValue::Str(_) => "string",
            CacheValue::Bytes(_) => "bytes",
        }
    }

    /// Returns true iff the value can be adjusted by incr/decr.
    pub fn is_numeric(&self) -> bool {
        matches!(self, CacheValue::Int(_) | CacheValue::Uint(_))
    }

    // == Incremented ==
    /// Returns the value adjusted by +1.
    ///
    /// Overflow is checked; non-integer variants produce a type error.
    /// `key` is only used to build the error message.
    pub fn incremented(&self, key: &str) -> Result<CacheValue> {
        match self {
            CacheValue::Int(n) => n
                .checked_add(1)
                .map(CacheValue::Int)
                .ok_or_else(|| CacheError::Overflow(key.to_string())),
            CacheValue::Uint(n) => n
                .checked_add(1)
                .map(CacheValue::Uint)
                .ok_or_else(|| CacheError::Overflow(key.to_string())),
            other => Err(CacheError::NotNumeric {
                key: key.to_string(),
                kind: other.kind(),
            }),
        }
    }

    // == Decremented ==
    /// Returns the value adjusted by -1.
    ///
    /// Decrementing `Uint(0)` is an underflow error, not a wrap.
    pub fn decremented(&self, key: &str) -> Result<CacheValue> {
        match self {
            CacheValue::Int(n) => n
                .checked_sub(1)
                .map(CacheValue::Int)
                .ok_or_else(|| CacheError::Overflow(key.to_string())),
            CacheValue::Uint(n) => n
                .checked_sub(1)
                .map(CacheValue::Uint)
                .ok_or_else(|| CacheError::Overflow(key.to_string())),
            other => Err(CacheError::NotNumeric {
                key: key.to_string(),
                kind: other.kind(),
            }),
        }
    }

    // == Accessors ==
    /// Returns the signed integer payload, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CacheValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CacheValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

// == Conversions ==
impl From<i64> for CacheValue {
    fn from(n: i64) -> Self {
        CacheValue::Int(n)
    }
}

impl From<u64> for CacheValue {
    fn from(n: u64) -> Self {
        CacheValue::Uint(n)
    }
}

impl From<f64> for CacheValue {
    fn from(f: f64) -> Self {
        CacheValue::Float(f)
    }
}

impl From<&str> for CacheValue {
    fn from(s: &str) -> Self {
        CacheValue::Str(s.to_string())
    }
}

impl From<String> for CacheValue {
    fn from(s: String) -> Self {
        CacheValue::Str(s)
    }
}

impl From<Vec<u8>> for CacheValue {
    fn from(b: Vec<u8>) -> Self {
        CacheValue::Bytes(b)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incremented_int() {
        let v = CacheValue::Int(1);
        assert_eq!(v.incremented("k").unwrap(), CacheValue::Int(2));
    }

    #[test]
    fn test_decremented_int() {
        let v = CacheValue::Int(0);
        assert_eq!(v.decremented("k").unwrap(), CacheValue::Int(-1));
    }

    #[test]
    fn test_uint_underflow() {
        let v = CacheValue::Uint(0);
        let result = v.decremented("k");
        assert!(matches!(result, Err(CacheError::Overflow(_))));
    }

    #[test]
    fn test_int_overflow() {
        let v = CacheValue::Int(i64::MAX);
        let result = v.incremented("k");
        assert!(matches!(result, Err(CacheError::Overflow(_))));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let v = CacheValue::Str("author".to_string());
        let result = v.incremented("k");
        assert!(matches!(result, Err(CacheError::NotNumeric { .. })));

        let v = CacheValue::Float(1.5);
        assert!(!v.is_numeric());
        assert!(v.decremented("k").is_err());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(CacheValue::from(3i64), CacheValue::Int(3));
        assert_eq!(CacheValue::from(3u64), CacheValue::Uint(3));
        assert_eq!(CacheValue::from(1.5f64), CacheValue::Float(1.5));
        assert_eq!(CacheValue::from("author"), CacheValue::Str("author".to_string()));
        assert_eq!(CacheValue::from(vec![1u8, 2]), CacheValue::Bytes(vec![1, 2]));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(CacheValue::Int(7).as_int(), Some(7));
        assert_eq!(CacheValue::Str("author".to_string()).as_int(), None);

        assert_eq!(CacheValue::from("author").as_str(), Some("author"));
        assert_eq!(CacheValue::Int(7).as_str(), None);
    }

    #[test]
    fn test_serde_roundtrip() {
        let v = CacheValue::Int(42);
        let json = serde_json::to_string(&v).unwrap();
        let back: CacheValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
