//! Query planner
//!
//! Produces deterministic plans: the same query against the same shape
//! always yields the same scan.

use crate::executor::{CriteriaFilter, SortOrdering, Window};
use crate::query::{Condition, Query};
use crate::resolver::{CompiledPath, Field};
use crate::shape::{Record, Shape};
use crate::storage::StoreKey;
use crate::store::StoreResult;

/// How candidate records are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanType {
    /// Single record by primary key
    PrimaryKey,
    /// Records listed under one value of a secondary index
    IndexedEquality,
    /// Every record of the bucket in key order
    FullScan,
}

impl ScanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::PrimaryKey => "PK_LOOKUP",
            ScanType::IndexedEquality => "INDEX_EQ",
            ScanType::FullScan => "FULL_SCAN",
        }
    }
}

/// Immutable query plan
#[derive(Debug)]
pub struct QueryPlan<'q> {
    /// Bucket holding the record type
    pub bucket: &'static str,
    pub scan_type: ScanType,
    /// Index used by `IndexedEquality`
    pub chosen_index: Option<&'static str>,
    /// Primary key or index value to look up
    pub lookup: Option<StoreKey>,
    pub filter: CriteriaFilter<'q>,
    pub ordering: SortOrdering,
    pub window: Window,
}

/// Query planner
#[derive(Debug, Clone, Copy)]
pub struct QueryPlanner {
    use_indexes: bool,
}

impl QueryPlanner {
    /// Creates a planner; `use_indexes` enables the secondary index path
    pub fn new(use_indexes: bool) -> Self {
        Self { use_indexes }
    }

    /// Plans `query` for records of type `T`.
    ///
    /// # Panics
    ///
    /// Panics if the query sorts by the record key.
    pub fn plan<'q, T: Record>(&self, query: &'q Query) -> StoreResult<QueryPlan<'q>> {
        let shape = T::shape();

        // 1. Compile criteria and ordering before touching storage
        let filter = CriteriaFilter::compile(shape, query.criteria())?;
        let ordering = SortOrdering::build(shape, query.sort_fields(), query.is_reversed())?;

        // 2. Select scan using strict priority order. Fast paths skip
        //    records, so they require criteria that fail on every record or
        //    on none.
        let (scan_type, chosen_index, lookup) = if filter.fails_per_record() {
            (ScanType::FullScan, None, None)
        } else {
            self.select_scan(shape, query)?
        };

        Ok(QueryPlan {
            bucket: T::bucket(),
            scan_type,
            chosen_index,
            lookup,
            filter,
            ordering,
            window: Window::new(query.skip_count(), query.limit_count()),
        })
    }

    fn select_scan(
        &self,
        shape: &'static Shape,
        query: &Query,
    ) -> StoreResult<(ScanType, Option<&'static str>, Option<StoreKey>)> {
        // Priority 1: primary key equality
        for criterion in query.criteria() {
            if !criterion.is_primary_key() {
                continue;
            }
            if let Condition::Eq(operand) = &criterion.condition {
                if let Ok(key) = StoreKey::from_value(operand) {
                    return Ok((ScanType::PrimaryKey, None, Some(key)));
                }
            }
        }

        if !self.use_indexes || shape.indexes().is_empty() {
            return Ok((ScanType::FullScan, None, None));
        }

        // Priority 2: indexed equality, lexicographically smallest index
        let mut candidates: Vec<(&'static str, StoreKey)> = Vec::new();
        for criterion in query.criteria() {
            let (Field::Path(path), Condition::Eq(operand)) =
                (&criterion.field, &criterion.condition)
            else {
                continue;
            };
            if criterion.negate {
                continue;
            }
            let Ok(value) = StoreKey::from_value(operand) else {
                continue;
            };
            let target = CompiledPath::compile(shape, path)?;
            for index in shape.indexes() {
                let indexed = CompiledPath::compile(shape, index.path())?;
                if same_target(&target, &indexed) {
                    candidates.push((index.name(), value.clone()));
                }
            }
        }
        candidates.sort_by(|a, b| a.0.cmp(b.0));

        match candidates.into_iter().next() {
            Some((index, value)) => Ok((ScanType::IndexedEquality, Some(index), Some(value))),
            None => Ok((ScanType::FullScan, None, None)),
        }
    }
}

/// True when both paths read the same field.
///
/// A promoted path and its qualified spelling compile to the same fields.
fn same_target(a: &CompiledPath, b: &CompiledPath) -> bool {
    a.steps().len() == b.steps().len()
        && a
            .steps()
            .iter()
            .zip(b.steps())
            .all(|(x, y)| x.field_name() == y.field_name())
}
