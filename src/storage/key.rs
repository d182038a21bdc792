//! Ordered key encoding
//!
//! Primary keys and secondary index values share one totally ordered type.
//! Ordering across kinds is fixed: Bool < Int < Uint < Float < String <
//! Bytes < Time < Uuid.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::value::Value;

use super::errors::{StorageError, StorageResult};

/// A value usable as a primary key or index key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StoreKey {
    Bool(bool),
    Int(i64),
    /// Only for values above `i64::MAX`; smaller unsigned values are `Int`
    Uint(u64),
    /// Float stored as order-preserving bits
    Float(u64),
    String(String),
    Bytes(Vec<u8>),
    Time(DateTime<Utc>),
    Uuid(Uuid),
}

impl StoreKey {
    /// Converts a value into a key.
    ///
    /// Integral floats and small unsigned integers collapse to `Int` so that
    /// numerically equal values always produce the same key.
    pub fn from_value(value: &Value) -> StorageResult<Self> {
        match value {
            Value::Bool(b) => Ok(StoreKey::Bool(*b)),
            Value::Int(i) => Ok(StoreKey::Int(*i)),
            Value::Uint(u) => Ok(match i64::try_from(*u) {
                Ok(i) => StoreKey::Int(i),
                Err(_) => StoreKey::Uint(*u),
            }),
            Value::Float(f) => Self::from_float(*f),
            Value::String(s) => Ok(StoreKey::String(s.clone())),
            Value::Bytes(b) => Ok(StoreKey::Bytes(b.clone())),
            Value::Time(t) => Ok(StoreKey::Time(*t)),
            Value::Uuid(u) => Ok(StoreKey::Uuid(*u)),
            Value::Null => Err(StorageError::invalid_key(value.kind(), "null is not a key")),
            Value::List(_) => Err(StorageError::invalid_key(value.kind(), "lists are not keys")),
        }
    }

    fn from_float(f: f64) -> StorageResult<Self> {
        if f.is_nan() {
            return Err(StorageError::invalid_key(
                crate::value::ValueKind::Number,
                "NaN is not a key",
            ));
        }
        if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            return Ok(StoreKey::Int(f as i64));
        }
        let bits = f.to_bits();
        let ordered = if (bits >> 63) == 1 {
            !bits
        } else {
            bits ^ (1 << 63)
        };
        Ok(StoreKey::Float(ordered))
    }

    /// Converts the key back into a value
    pub fn to_value(&self) -> Value {
        match self {
            StoreKey::Bool(b) => Value::Bool(*b),
            StoreKey::Int(i) => Value::Int(*i),
            StoreKey::Uint(u) => Value::Uint(*u),
            StoreKey::Float(ordered) => {
                let bits = if (ordered >> 63) == 1 {
                    ordered ^ (1 << 63)
                } else {
                    !ordered
                };
                Value::Float(f64::from_bits(bits))
            }
            StoreKey::String(s) => Value::String(s.clone()),
            StoreKey::Bytes(b) => Value::Bytes(b.clone()),
            StoreKey::Time(t) => Value::Time(*t),
            StoreKey::Uuid(u) => Value::Uuid(*u),
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}
