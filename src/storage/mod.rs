//! Storage collaborator for the query layer
//!
//! The query layer talks to storage only through [`Backend`] and
//! [`Transaction`]. [`MemoryBackend`] is the bundled engine.
//!
//! # Guarantees
//!
//! - Records are stored checksummed; every read validates the checksum
//! - Iteration is in ascending [`StoreKey`] order
//! - Readers see a consistent snapshot
//! - Writes are all-or-nothing per transaction

mod backend;
mod checksum;
mod codec;
mod errors;
mod index_tree;
mod key;
mod memory;

pub use backend::{Backend, Transaction};
pub use checksum::{compute_checksum, verify_checksum};
pub use codec::{decode, encode};
pub use errors::{StorageError, StorageResult};
pub use index_tree::IndexTree;
pub use key::StoreKey;
pub use memory::{MemoryBackend, MemoryTransaction};
