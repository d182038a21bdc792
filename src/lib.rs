//! structhold - structured queries over an embedded key-value store
//!
//! Records are stored under primary keys in per-type buckets. Queries filter
//! on named fields (nested, embedded and behind pointers), sort by any number
//! of fields, then skip and limit. Find, update-matching and delete-matching
//! all act on the same window of matched records.

pub mod executor;
pub mod observability;
pub mod planner;
pub mod query;
pub mod resolver;
pub mod shape;
pub mod storage;
pub mod store;
pub mod value;

pub use observability::{MetricsSnapshot, Severity};
pub use query::{BoxError, Condition, Criterion, CriterionBuilder, Query};
pub use resolver::{Field, FieldPath, KEY};
pub use shape::{Record, Shape, ShapeBuilder, Shaped};
pub use storage::{Backend, MemoryBackend, StoreKey, Transaction};
pub use store::{Store, StoreConfig, StoreError, StoreErrorCode, StoreResult};
pub use value::{Value, ValueKind};
