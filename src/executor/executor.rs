//! Query executor
//!
//! Execution flow (strict order):
//! 1. Obtain candidate records through the planned scan
//! 2. Decode each record, validating its checksum
//! 3. Filter strictly according to the criteria
//! 4. Sort (stable), then reverse if requested
//! 5. Apply skip, then limit
//!
//! Find, update-matching and delete-matching all act on the window this
//! produces.

use crate::planner::{QueryPlan, ScanType};
use crate::shape::Record;
use crate::storage::{decode, StorageError, StoreKey, Transaction};
use crate::store::StoreResult;

/// Records selected by a query, in final order
#[derive(Debug)]
pub struct MatchWindow<T> {
    /// Key and record pairs after sort, skip and limit
    pub entries: Vec<(StoreKey, T)>,
    /// Candidates read from storage
    pub scanned: u64,
    /// Candidates that satisfied every criterion, before windowing
    pub matched: u64,
    pub scan_type: ScanType,
}

impl<T> MatchWindow<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Primary keys of the window, in order
    pub fn keys(&self) -> impl Iterator<Item = &StoreKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Drops the keys, keeping records in order
    pub fn into_records(self) -> Vec<T> {
        self.entries.into_iter().map(|(_, record)| record).collect()
    }
}

/// Executes plans inside one transaction
pub struct QueryExecutor<'a, X: Transaction> {
    txn: &'a X,
}

impl<'a, X: Transaction> QueryExecutor<'a, X> {
    pub fn new(txn: &'a X) -> Self {
        Self { txn }
    }

    /// Executes `plan` and returns the match window.
    ///
    /// Deterministic: same plan and same snapshot give the same window.
    pub fn execute<T: Record>(&self, plan: &QueryPlan<'_>) -> StoreResult<MatchWindow<T>> {
        // Steps 1-2: candidates in primary key order, checksum-validated
        let (scan_type, candidates) = self.candidates::<T>(plan)?;
        let scanned = candidates.len() as u64;

        // Step 3: filter; the first error aborts with no partial result
        let mut entries = Vec::with_capacity(candidates.len());
        for (key, record) in candidates {
            if plan.filter.matches(&key, &record)? {
                entries.push((key, record));
            }
        }
        let matched = entries.len() as u64;

        // Step 4: sort and reverse
        plan.ordering.apply(&mut entries)?;

        // Step 5: skip, limit
        plan.window.apply(&mut entries);

        Ok(MatchWindow {
            entries,
            scanned,
            matched,
            scan_type,
        })
    }

    /// Candidates in primary key order, with the scan that produced them.
    ///
    /// A lookup that finds nothing cannot tell an absent value from an
    /// operand no stored value compares with, so it falls back to a full
    /// scan and the criteria decide.
    fn candidates<T: Record>(
        &self,
        plan: &QueryPlan<'_>,
    ) -> StoreResult<(ScanType, Vec<(StoreKey, T)>)> {
        let bucket = plan.bucket;
        let found = match (plan.scan_type, &plan.lookup) {
            (ScanType::PrimaryKey, Some(key)) => match self.txn.get(bucket, key)? {
                Some(bytes) => vec![(key.clone(), decode(bucket, &bytes)?)],
                None => Vec::new(),
            },
            (ScanType::IndexedEquality, Some(value)) => {
                let index = plan.chosen_index.unwrap_or_default();
                let keys = self.txn.index_lookup(bucket, index, value)?;
                let mut records = Vec::with_capacity(keys.len());
                for key in keys {
                    let bytes = self.txn.get(bucket, &key)?.ok_or_else(|| {
                        StorageError::corruption(
                            bucket,
                            format!("index '{}' lists missing record {}", index, key),
                        )
                    })?;
                    let record = decode(bucket, &bytes)?;
                    records.push((key, record));
                }
                records
            }
            _ => Vec::new(),
        };

        if found.is_empty() {
            return Ok((ScanType::FullScan, self.full_scan(bucket)?));
        }
        Ok((plan.scan_type, found))
    }

    fn full_scan<T: Record>(&self, bucket: &str) -> StoreResult<Vec<(StoreKey, T)>> {
        let mut records = Vec::new();
        self.txn.scan(bucket, |key, bytes| {
            records.push((key.clone(), decode(bucket, bytes)?));
            Ok(())
        })?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::QueryPlanner;
    use crate::query::Query;
    use crate::shape::{Shape, ShapeBuilder, Shaped};
    use crate::storage::{encode, Backend, MemoryBackend};
    use serde::{Deserialize, Serialize};
    use std::sync::OnceLock;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        topic: String,
        words: u32,
    }

    impl Shaped for Note {
        fn shape() -> &'static Shape {
            static SHAPE: OnceLock<Shape> = OnceLock::new();
            SHAPE.get_or_init(|| {
                ShapeBuilder::<Note>::new("Note")
                    .field("Topic", |n| n.topic.as_str().into())
                    .field("Words", |n| n.words.into())
                    .build()
            })
        }
    }

    impl Record for Note {}

    fn backend() -> MemoryBackend {
        let backend = MemoryBackend::new();
        let mut txn = backend.begin(true).unwrap();
        for (i, (topic, words)) in [("rust", 30), ("go", 10), ("rust", 20), ("zig", 5)]
            .into_iter()
            .enumerate()
        {
            let note = Note {
                topic: topic.to_string(),
                words,
            };
            txn.put("Note", StoreKey::Int(i as i64), encode(&note).unwrap())
                .unwrap();
        }
        txn.commit().unwrap();
        backend
    }

    fn run(query: &Query) -> StoreResult<MatchWindow<Note>> {
        let backend = backend();
        let txn = backend.begin(false).unwrap();
        let plan = QueryPlanner::new(true).plan::<Note>(query)?;
        QueryExecutor::new(&txn).execute(&plan)
    }

    #[test]
    fn test_counts_and_order() {
        let window = run(&Query::filter("Topic").eq("rust").sort_by(["Words"])).unwrap();
        assert_eq!(window.scanned, 4);
        assert_eq!(window.matched, 2);
        assert_eq!(
            window.keys().cloned().collect::<Vec<_>>(),
            vec![StoreKey::Int(2), StoreKey::Int(0)]
        );
    }

    #[test]
    fn test_primary_key_scan_reads_one() {
        let window = run(&Query::filter(crate::resolver::KEY).eq(3)).unwrap();
        assert_eq!(window.scan_type, ScanType::PrimaryKey);
        assert_eq!(window.scanned, 1);
        assert_eq!(window.into_records()[0].topic, "zig");
    }

    #[test]
    fn test_missing_primary_key_falls_back_to_scan() {
        let window = run(&Query::filter(crate::resolver::KEY).eq(99)).unwrap();
        assert!(window.is_empty());
        assert_eq!(window.scan_type, ScanType::FullScan);
        assert_eq!(window.scanned, 4);
    }

    #[test]
    fn test_mismatched_primary_key_operand_fails() {
        let err = run(&Query::filter(crate::resolver::KEY).eq("three")).unwrap_err();
        assert_eq!(err.code(), crate::store::StoreErrorCode::HoldTypeMismatch);
    }

    #[test]
    fn test_error_aborts_without_partial_result() {
        let err = run(&Query::filter("Words").gt("many")).unwrap_err();
        assert_eq!(err.field(), Some("Words"));
    }

    #[test]
    fn test_corrupted_record_fails() {
        let backend = backend();
        let mut txn = backend.begin(true).unwrap();
        txn.put("Note", StoreKey::Int(1), b"\x00\x00\x00\x00{}".to_vec())
            .unwrap();
        let query = Query::all();
        let plan = QueryPlanner::new(true).plan::<Note>(&query).unwrap();
        let err = QueryExecutor::new(&txn).execute::<Note>(&plan).unwrap_err();
        assert!(err.is_fatal());
    }
}
