//! Storage collaborator interface
//!
//! The query layer needs only keyed get/put/delete, ordered iteration over a
//! bucket, equality lookups on secondary indexes and a transaction scope.
//! Snapshot isolation for readers and serialized writers are the backend's
//! responsibility.

use super::errors::StorageResult;
use super::key::StoreKey;

/// A transaction over one backend.
///
/// Reads observe a consistent snapshot. Writes become visible to other
/// transactions only on [`Transaction::commit`]; dropping an uncommitted
/// transaction discards them.
pub trait Transaction {
    /// Returns true if this transaction accepts writes
    fn is_writable(&self) -> bool;

    /// Encoded record stored under `key`
    fn get(&self, bucket: &str, key: &StoreKey) -> StorageResult<Option<Vec<u8>>>;

    /// Visits every record of `bucket` in ascending key order.
    ///
    /// Stops at the first error returned by `visit`.
    fn scan<F>(&self, bucket: &str, visit: F) -> StorageResult<()>
    where
        F: FnMut(&StoreKey, &[u8]) -> StorageResult<()>;

    /// Stores `bytes` under `key`, replacing any previous record
    fn put(&mut self, bucket: &str, key: StoreKey, bytes: Vec<u8>) -> StorageResult<()>;

    /// Removes the record under `key`. Returns true if it existed.
    fn delete(&mut self, bucket: &str, key: &StoreKey) -> StorageResult<bool>;

    /// Primary keys indexed under `value`, ascending
    fn index_lookup(
        &self,
        bucket: &str,
        index: &str,
        value: &StoreKey,
    ) -> StorageResult<Vec<StoreKey>>;

    fn index_insert(
        &mut self,
        bucket: &str,
        index: &str,
        value: StoreKey,
        key: StoreKey,
    ) -> StorageResult<()>;

    fn index_remove(
        &mut self,
        bucket: &str,
        index: &str,
        value: &StoreKey,
        key: &StoreKey,
    ) -> StorageResult<()>;

    /// Publishes all writes atomically
    fn commit(self) -> StorageResult<()>;

    /// Discards all writes
    fn rollback(self);
}

/// An ordered key-value engine that hands out transactions
pub trait Backend: Send + Sync {
    type Txn<'a>: Transaction
    where
        Self: 'a;

    /// Begins a transaction. Writable transactions are serialized.
    fn begin(&self, writable: bool) -> StorageResult<Self::Txn<'_>>;
}
