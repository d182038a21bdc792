//! In-memory reference backend
//!
//! Committed state is an immutable snapshot behind an `Arc`. Readers clone
//! the `Arc` and never block writers. A writer holds the writer mutex for
//! its whole lifetime, mutates a private copy of the state (buckets are
//! shared until first touched) and swaps it in on commit.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use super::backend::{Backend, Transaction};
use super::errors::{StorageError, StorageResult};
use super::index_tree::IndexTree;
use super::key::StoreKey;

#[derive(Debug, Clone, Default)]
struct Bucket {
    records: BTreeMap<StoreKey, Vec<u8>>,
    indexes: BTreeMap<String, IndexTree>,
}

#[derive(Debug, Clone, Default)]
struct State {
    buckets: BTreeMap<String, Arc<Bucket>>,
}

impl State {
    fn bucket(&self, name: &str) -> Option<&Bucket> {
        self.buckets.get(name).map(Arc::as_ref)
    }

    fn bucket_mut(&mut self, name: &str) -> &mut Bucket {
        Arc::make_mut(self.buckets.entry(name.to_string()).or_default())
    }
}

/// Transactional in-memory backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    committed: RwLock<Arc<State>>,
    writer: Mutex<()>,
    commits: AtomicU64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed write transactions
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }

    fn snapshot(&self) -> StorageResult<Arc<State>> {
        let guard = self
            .committed
            .read()
            .map_err(|_| StorageError::LockPoisoned)?;
        Ok(Arc::clone(&guard))
    }
}

impl Backend for MemoryBackend {
    type Txn<'a> = MemoryTransaction<'a>;

    fn begin(&self, writable: bool) -> StorageResult<MemoryTransaction<'_>> {
        let mode = if writable {
            // Taken before the snapshot so the copy reflects every prior commit.
            // The mutex guards no data and a panicking writer never published,
            // so poisoning is ignored.
            let guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
            let state = State::clone(&*self.snapshot()?);
            Mode::Write { _guard: guard, state }
        } else {
            Mode::Read(self.snapshot()?)
        };
        Ok(MemoryTransaction {
            backend: self,
            mode,
        })
    }
}

enum Mode<'a> {
    Read(Arc<State>),
    Write {
        _guard: MutexGuard<'a, ()>,
        state: State,
    },
}

/// Transaction over a [`MemoryBackend`]
pub struct MemoryTransaction<'a> {
    backend: &'a MemoryBackend,
    mode: Mode<'a>,
}

impl MemoryTransaction<'_> {
    fn state(&self) -> &State {
        match &self.mode {
            Mode::Read(state) => state.as_ref(),
            Mode::Write { state, .. } => state,
        }
    }

    fn state_mut(&mut self) -> StorageResult<&mut State> {
        match &mut self.mode {
            Mode::Read(_) => Err(StorageError::ReadOnly),
            Mode::Write { state, .. } => Ok(state),
        }
    }
}

impl Transaction for MemoryTransaction<'_> {
    fn is_writable(&self) -> bool {
        matches!(self.mode, Mode::Write { .. })
    }

    fn get(&self, bucket: &str, key: &StoreKey) -> StorageResult<Option<Vec<u8>>> {
        Ok(self
            .state()
            .bucket(bucket)
            .and_then(|b| b.records.get(key))
            .cloned())
    }

    fn scan<F>(&self, bucket: &str, mut visit: F) -> StorageResult<()>
    where
        F: FnMut(&StoreKey, &[u8]) -> StorageResult<()>,
    {
        if let Some(bucket) = self.state().bucket(bucket) {
            for (key, bytes) in &bucket.records {
                visit(key, bytes)?;
            }
        }
        Ok(())
    }

    fn put(&mut self, bucket: &str, key: StoreKey, bytes: Vec<u8>) -> StorageResult<()> {
        self.state_mut()?.bucket_mut(bucket).records.insert(key, bytes);
        Ok(())
    }

    fn delete(&mut self, bucket: &str, key: &StoreKey) -> StorageResult<bool> {
        let state = self.state_mut()?;
        if state.bucket(bucket).map_or(true, |b| !b.records.contains_key(key)) {
            return Ok(false);
        }
        Ok(state.bucket_mut(bucket).records.remove(key).is_some())
    }

    fn index_lookup(
        &self,
        bucket: &str,
        index: &str,
        value: &StoreKey,
    ) -> StorageResult<Vec<StoreKey>> {
        Ok(self
            .state()
            .bucket(bucket)
            .and_then(|b| b.indexes.get(index))
            .map(|tree| tree.lookup_eq(value))
            .unwrap_or_default())
    }

    fn index_insert(
        &mut self,
        bucket: &str,
        index: &str,
        value: StoreKey,
        key: StoreKey,
    ) -> StorageResult<()> {
        self.state_mut()?
            .bucket_mut(bucket)
            .indexes
            .entry(index.to_string())
            .or_default()
            .insert(value, key);
        Ok(())
    }

    fn index_remove(
        &mut self,
        bucket: &str,
        index: &str,
        value: &StoreKey,
        key: &StoreKey,
    ) -> StorageResult<()> {
        let state = self.state_mut()?;
        if state.bucket(bucket).map_or(true, |b| !b.indexes.contains_key(index)) {
            return Ok(());
        }
        if let Some(tree) = state.bucket_mut(bucket).indexes.get_mut(index) {
            tree.remove(value, key);
        }
        Ok(())
    }

    fn commit(self) -> StorageResult<()> {
        let Mode::Write { _guard, state } = self.mode else {
            return Ok(());
        };
        let mut committed = self
            .backend
            .committed
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        *committed = Arc::new(state);
        self.backend.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn rollback(self) {}
}
