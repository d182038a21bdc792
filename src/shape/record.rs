//! Traits implemented by stored types

use std::any::Any;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Shape;

/// A composite type with a static shape description.
///
/// Implemented by records and by every struct nested inside one.
pub trait Shaped: Any + Send + Sync {
    /// Returns the shape of this type. Must return the same instance on
    /// every call (typically a `static OnceLock<Shape>`).
    fn shape() -> &'static Shape;
}

/// A type that can be stored under a primary key.
pub trait Record: Shaped + Serialize + DeserializeOwned {
    /// Bucket holding records of this type
    fn bucket() -> &'static str {
        Self::shape().name()
    }
}
