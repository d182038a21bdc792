//! Store operation surface
//!
//! Every query operation follows the same path:
//! 1. Plan (compile criteria and ordering, choose a scan) before any storage
//!    access
//! 2. Open a transaction
//! 3. Execute the plan to a match window
//! 4. Read, mutate or delete exactly that window
//!
//! Matching mutations run in a single write transaction. The first failure
//! rolls it back; nothing is published.

use crate::executor::{MatchWindow, QueryExecutor};
use crate::observability::{
    log_event, Event, Logger, MetricsRegistry, MetricsSnapshot, ObservationScope,
};
use crate::planner::{QueryPlan, QueryPlanner, ScanType};
use crate::query::{BoxError, Query};
use crate::resolver::CompiledPath;
use crate::shape::Record;
use crate::storage::{decode, encode, Backend, MemoryBackend, StoreKey, Transaction};
use crate::value::Value;

use super::config::StoreConfig;
use super::errors::{StoreError, StoreResult};

/// Index name and indexed value for one record
type IndexEntries = Vec<(&'static str, StoreKey)>;

/// Structured record store over a transactional backend
pub struct Store<B: Backend = MemoryBackend> {
    backend: B,
    config: StoreConfig,
    planner: QueryPlanner,
    metrics: MetricsRegistry,
}

impl Store<MemoryBackend> {
    /// Opens an empty in-memory store with default configuration
    pub fn in_memory() -> Self {
        Self::open(StoreConfig::default())
    }

    /// Opens an empty in-memory store
    pub fn open(config: StoreConfig) -> Self {
        Self::with_backend(MemoryBackend::new(), config)
    }

    /// Opens an empty in-memory store configured from a JSON file
    pub fn open_with_config_file(path: impl AsRef<std::path::Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let config = StoreConfig::from_file(path)?;
        log_event(
            Event::ConfigLoaded,
            &[("path", &path.display().to_string())],
        );
        Ok(Self::open(config))
    }
}

impl<B: Backend> Store<B> {
    /// Wraps an existing backend.
    ///
    /// A configured `log_level` is applied to the process-wide logger.
    pub fn with_backend(backend: B, config: StoreConfig) -> Self {
        if let Some(level) = config.log_level {
            Logger::set_min_severity(level);
        }
        log_event(
            Event::StoreOpened,
            &[
                ("log_level", Logger::min_severity().as_str()),
                ("use_indexes", if config.use_indexes { "true" } else { "false" }),
            ],
        );
        Self {
            backend,
            planner: QueryPlanner::new(config.use_indexes),
            config,
            metrics: MetricsRegistry::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Point-in-time copy of the store counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    // ==================
    // Single records
    // ==================

    /// Stores `record` under `key`; fails if the key is taken
    pub fn insert<T: Record>(&self, key: impl Into<Value>, record: &T) -> StoreResult<()> {
        let key = StoreKey::from_value(&key.into())?;
        self.write_txn(T::bucket(), |txn| {
            if txn.get(T::bucket(), &key)?.is_some() {
                return Err(StoreError::key_exists(T::bucket(), &key));
            }
            put_record(txn, &key, record, Vec::new())
        })?;
        self.metrics.add_inserted(1);
        Ok(())
    }

    /// Stores `record` under `key`, replacing any existing record
    pub fn upsert<T: Record>(&self, key: impl Into<Value>, record: &T) -> StoreResult<()> {
        let key = StoreKey::from_value(&key.into())?;
        let replaced = self.write_txn(T::bucket(), |txn| {
            let previous = match load::<T, _>(&*txn, &key)? {
                Some(old) => Some(index_entries(&old)?),
                None => None,
            };
            let replaced = previous.is_some();
            put_record(txn, &key, record, previous.unwrap_or_default())?;
            Ok(replaced)
        })?;
        if replaced {
            self.metrics.add_updated(1);
        } else {
            self.metrics.add_inserted(1);
        }
        Ok(())
    }

    /// Replaces the record under `key`; fails if there is none
    pub fn update<T: Record>(&self, key: impl Into<Value>, record: &T) -> StoreResult<()> {
        let key = StoreKey::from_value(&key.into())?;
        self.write_txn(T::bucket(), |txn| {
            let old = load::<T, _>(&*txn, &key)?
                .ok_or_else(|| StoreError::key_not_found(T::bucket(), &key))?;
            put_record(txn, &key, record, index_entries(&old)?)
        })?;
        self.metrics.add_updated(1);
        Ok(())
    }

    /// Removes the record of type `T` under `key`; fails if there is none
    pub fn delete<T: Record>(&self, key: impl Into<Value>) -> StoreResult<()> {
        let key = StoreKey::from_value(&key.into())?;
        self.write_txn(T::bucket(), |txn| {
            let old = load::<T, _>(&*txn, &key)?
                .ok_or_else(|| StoreError::key_not_found(T::bucket(), &key))?;
            delete_record(txn, &key, &old)
        })?;
        self.metrics.add_deleted(1);
        Ok(())
    }

    pub fn get<T: Record>(&self, key: impl Into<Value>) -> StoreResult<Option<T>> {
        let key = StoreKey::from_value(&key.into())?;
        let txn = self.backend.begin(false)?;
        let record = load::<T, _>(&txn, &key).map_err(|e| self.record_failure::<T>(e));
        txn.rollback();
        record
    }

    // ==================
    // Queries
    // ==================

    /// Clears `result` and fills it with the records matched by `query`.
    ///
    /// `None` matches every record of type `T`.
    ///
    /// # Panics
    ///
    /// Panics if the query sorts by the record key.
    pub fn find<'q, T: Record>(
        &self,
        result: &mut Vec<T>,
        query: impl Into<Option<&'q Query>>,
    ) -> StoreResult<()> {
        let window = self.find_window::<T>(query)?;
        result.clear();
        result.extend(window.into_records());
        Ok(())
    }

    /// First record of the match window
    pub fn find_one<'q, T: Record>(
        &self,
        query: impl Into<Option<&'q Query>>,
    ) -> StoreResult<Option<T>> {
        Ok(self.find_window::<T>(query)?.into_records().into_iter().next())
    }

    /// Number of records in the match window
    pub fn count<'q, T: Record>(&self, query: impl Into<Option<&'q Query>>) -> StoreResult<usize> {
        Ok(self.find_window::<T>(query)?.len())
    }

    /// Calls `visit` with each key and record of the match window, in order
    pub fn for_each<'q, T, F>(&self, query: impl Into<Option<&'q Query>>, mut visit: F) -> StoreResult<()>
    where
        T: Record,
        F: FnMut(&StoreKey, T),
    {
        for (key, record) in self.find_window::<T>(query)?.entries {
            visit(&key, record);
        }
        Ok(())
    }

    /// Match window with keys and scan counts, read from one snapshot
    pub fn find_window<'q, T: Record>(
        &self,
        query: impl Into<Option<&'q Query>>,
    ) -> StoreResult<MatchWindow<T>> {
        let all = Query::default();
        let query = query.into().unwrap_or(&all);
        let plan = self.plan::<T>(query)?;

        let txn = self.backend.begin(false)?;
        let window = self.execute::<T, _>(&txn, &plan);
        txn.rollback();
        window
    }

    // ==================
    // Matching mutations
    // ==================

    /// Applies `mutate` to every record in the match window and stores the
    /// results, in one transaction.
    ///
    /// The first error from `mutate` rolls the transaction back and is
    /// returned as `HOLD_MUTATION_FAILED`. Returns the number of records
    /// updated.
    ///
    /// # Panics
    ///
    /// Panics if the query sorts by the record key.
    pub fn update_matching<'q, T, F, E>(
        &self,
        query: impl Into<Option<&'q Query>>,
        mut mutate: F,
    ) -> StoreResult<usize>
    where
        T: Record,
        F: FnMut(&mut T) -> Result<(), E>,
        E: Into<BoxError>,
    {
        let all = Query::default();
        let query = query.into().unwrap_or(&all);
        let plan = self.plan::<T>(query)?;

        let bucket = T::bucket();
        let scope = ObservationScope::new(Event::UpdateMatching.as_str(), &[("bucket", bucket)]);
        let outcome = self.write_txn(bucket, |txn| {
            let window = self.execute::<T, _>(&*txn, &plan)?;
            let count = window.len();
            for (key, mut record) in window.entries {
                let previous = index_entries(&record)?;
                mutate(&mut record).map_err(|e| StoreError::mutation_failed(&key, e.into()))?;
                put_record(txn, &key, &record, previous)?;
            }
            Ok(count)
        });

        match &outcome {
            Ok(count) => {
                self.metrics.add_updated(*count as u64);
                scope.complete(&[("updated", &count.to_string())]);
            }
            Err(e) => scope.fail(&e.to_string(), e.is_fatal()),
        }
        outcome
    }

    /// Deletes every record in the match window, in one transaction.
    ///
    /// Returns the number of records deleted.
    ///
    /// # Panics
    ///
    /// Panics if the query sorts by the record key.
    pub fn delete_matching<'q, T: Record>(
        &self,
        query: impl Into<Option<&'q Query>>,
    ) -> StoreResult<usize> {
        let all = Query::default();
        let query = query.into().unwrap_or(&all);
        let plan = self.plan::<T>(query)?;

        let bucket = T::bucket();
        let scope = ObservationScope::new(Event::DeleteMatching.as_str(), &[("bucket", bucket)]);
        let outcome = self.write_txn(bucket, |txn| {
            let window = self.execute::<T, _>(&*txn, &plan)?;
            let count = window.len();
            for (key, record) in &window.entries {
                delete_record(txn, key, record)?;
            }
            Ok(count)
        });

        match &outcome {
            Ok(count) => {
                self.metrics.add_deleted(*count as u64);
                scope.complete(&[("deleted", &count.to_string())]);
            }
            Err(e) => scope.fail(&e.to_string(), e.is_fatal()),
        }
        outcome
    }

    // ==================
    // Internals
    // ==================

    fn plan<'q, T: Record>(&self, query: &'q Query) -> StoreResult<QueryPlan<'q>> {
        self.planner
            .plan::<T>(query)
            .map_err(|e| self.record_failure::<T>(e))
    }

    /// Runs `plan` against `txn`, recording metrics and log events
    fn execute<T: Record, X: Transaction>(
        &self,
        txn: &X,
        plan: &QueryPlan<'_>,
    ) -> StoreResult<MatchWindow<T>> {
        let window = QueryExecutor::new(txn)
            .execute::<T>(plan)
            .map_err(|e| self.record_failure::<T>(e))?;

        self.metrics.increment_queries_executed();
        self.metrics.add_scanned(window.scanned, window.matched);
        if window.scan_type == ScanType::IndexedEquality {
            self.metrics.increment_index_scans();
            log_event(
                Event::IndexScan,
                &[
                    ("bucket", plan.bucket),
                    ("index", plan.chosen_index.unwrap_or_default()),
                ],
            );
        }
        if Logger::enabled(Event::QueryExecuted.severity()) {
            log_event(
                Event::QueryExecuted,
                &[
                    ("bucket", plan.bucket),
                    ("scan", window.scan_type.as_str()),
                    ("scanned", &window.scanned.to_string()),
                    ("matched", &window.matched.to_string()),
                    ("returned", &window.len().to_string()),
                ],
            );
        }
        Ok(window)
    }

    /// Counts and logs a failed query, passing the error through
    fn record_failure<T: Record>(&self, err: StoreError) -> StoreError {
        self.metrics.increment_queries_failed();
        let event = if err.is_fatal() {
            Event::DataCorruption
        } else {
            Event::QueryFailed
        };
        log_event(
            event,
            &[
                ("bucket", T::bucket()),
                ("code", err.code().code()),
                ("message", err.message()),
            ],
        );
        err
    }

    /// Runs `work` in a write transaction; commits on success, rolls back
    /// on error
    fn write_txn<'s, R>(
        &'s self,
        bucket: &str,
        work: impl FnOnce(&mut B::Txn<'s>) -> StoreResult<R>,
    ) -> StoreResult<R> {
        let mut txn = self.backend.begin(true)?;
        match work(&mut txn) {
            Ok(result) => {
                txn.commit()?;
                Ok(result)
            }
            Err(err) => {
                txn.rollback();
                self.metrics.increment_rollbacks();
                log_event(
                    Event::TransactionRolledBack,
                    &[("bucket", bucket), ("code", err.code().code())],
                );
                Err(err)
            }
        }
    }
}

fn load<T: Record, X: Transaction>(txn: &X, key: &StoreKey) -> StoreResult<Option<T>> {
    match txn.get(T::bucket(), key)? {
        Some(bytes) => Ok(Some(decode(T::bucket(), &bytes)?)),
        None => Ok(None),
    }
}

/// Writes `record` under `key`, moving its index entries from `previous`
/// to the record's current values
fn put_record<T: Record, X: Transaction>(
    txn: &mut X,
    key: &StoreKey,
    record: &T,
    previous: IndexEntries,
) -> StoreResult<()> {
    let bucket = T::bucket();
    for (index, value) in previous {
        txn.index_remove(bucket, index, &value, key)?;
    }
    txn.put(bucket, key.clone(), encode(record)?)?;
    for (index, value) in index_entries(record)? {
        txn.index_insert(bucket, index, value, key.clone())?;
    }
    Ok(())
}

fn delete_record<T: Record, X: Transaction>(
    txn: &mut X,
    key: &StoreKey,
    record: &T,
) -> StoreResult<()> {
    let bucket = T::bucket();
    for (index, value) in index_entries(record)? {
        txn.index_remove(bucket, index, &value, key)?;
    }
    txn.delete(bucket, key)?;
    Ok(())
}

/// Indexed values of `record`.
///
/// Values that do not resolve (nil pointer on the path) or are not keys
/// (null, lists) are left out of the index.
fn index_entries<T: Record>(record: &T) -> StoreResult<IndexEntries> {
    let shape = T::shape();
    let mut entries = Vec::with_capacity(shape.indexes().len());
    for index in shape.indexes() {
        let path = CompiledPath::compile(shape, index.path())?;
        let Ok(value) = path.value(record) else {
            continue;
        };
        if let Ok(key) = StoreKey::from_value(&value) {
            entries.push((index.name(), key));
        }
    }
    Ok(entries)
}
