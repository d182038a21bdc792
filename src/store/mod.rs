//! Store
//!
//! The operation surface: single-record writes and reads, queries and
//! matching mutations over a transactional [`Backend`](crate::storage::Backend).
//!
//! # Usage
//!
//! ```ignore
//! use structhold::{Query, Store};
//!
//! let store = Store::in_memory();
//! store.insert(1, &item)?;
//!
//! let mut animals: Vec<Item> = Vec::new();
//! store.find(&mut animals, &Query::filter("Category").eq("animal").sort_by(["Name"]))?;
//! ```

mod config;
mod errors;
mod store;

pub use config::StoreConfig;
pub use errors::{StoreError, StoreErrorCode, StoreResult};
pub use store::Store;
