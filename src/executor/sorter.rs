//! Result ordering
//!
//! Sorting is stable and lexicographic over the sort fields, with nulls
//! first. Reversal flips the whole sorted sequence, so records that tie on
//! every sort field also come out in reverse input order.

use std::any::Any;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::resolver::{CompiledPath, Field, FieldPath};
use crate::shape::Shape;
use crate::storage::StoreKey;
use crate::store::{StoreError, StoreResult};
use crate::value::{sort_compare, CompareError, Value, ValueKind};

/// Compiled sort fields plus the reverse flag
#[derive(Debug, Clone)]
pub struct SortOrdering {
    keys: Vec<Arc<CompiledPath>>,
    reverse: bool,
}

impl SortOrdering {
    /// Compiles `fields` against `shape`, dropping repeated fields.
    ///
    /// # Panics
    ///
    /// Panics if any field is the record key. The key is stored beside the
    /// record and has no sort value; sorting by it is a caller bug.
    pub fn build(shape: &'static Shape, fields: &[Field], reverse: bool) -> StoreResult<Self> {
        if fields.iter().any(Field::is_key) {
            panic!("cannot sort by the record key");
        }
        let mut seen: Vec<&FieldPath> = Vec::with_capacity(fields.len());
        let mut keys = Vec::with_capacity(fields.len());
        for path in fields.iter().filter_map(Field::as_path) {
            if seen.contains(&path) {
                continue;
            }
            seen.push(path);
            keys.push(CompiledPath::compile(shape, path)?);
        }
        Ok(Self { keys, reverse })
    }

    /// True when there are no sort fields
    pub fn is_unsorted(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn is_reversed(&self) -> bool {
        self.reverse
    }

    /// Field paths in sort priority order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.path().as_str())
    }

    /// Orders `entries` in place.
    ///
    /// Sort values are resolved for every entry and each column is checked
    /// for a single kind before any comparison, so errors surface before the
    /// sort begins.
    pub fn apply<T: Any>(&self, entries: &mut Vec<(StoreKey, T)>) -> StoreResult<()> {
        if !self.keys.is_empty() {
            let mut keyed = std::mem::take(entries)
                .into_iter()
                .map(|entry| -> StoreResult<(Vec<Value>, (StoreKey, T))> {
                    let values = self
                        .keys
                        .iter()
                        .map(|key| key.value(&entry.1))
                        .collect::<Result<Vec<Value>, _>>()?;
                    Ok((values, entry))
                })
                .collect::<StoreResult<Vec<_>>>()?;

            for (index, key) in self.keys.iter().enumerate() {
                uniform_kind(keyed.iter().map(|(values, _)| &values[index]))
                    .map_err(|err| StoreError::type_mismatch(key.path().to_string(), err))?;
            }
            keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b));

            *entries = keyed.into_iter().map(|(_, entry)| entry).collect();
        }

        if self.reverse {
            entries.reverse();
        }
        Ok(())
    }
}

/// Checks that every non-null value of a sort column has one kind, list
/// elements included, so any two values of the column compare.
fn uniform_kind<'a>(values: impl Iterator<Item = &'a Value>) -> Result<(), CompareError> {
    let mut kind: Option<ValueKind> = None;
    let mut elements: Vec<&Value> = Vec::new();
    for value in values.filter(|v| !v.is_null()) {
        match kind {
            None => kind = Some(value.kind()),
            Some(expected) if expected != value.kind() => {
                return Err(CompareError::mismatch("ordering", expected, value.kind()));
            }
            Some(_) => {}
        }
        if let Value::List(items) = value {
            elements.extend(items.iter());
        }
    }
    if elements.is_empty() {
        return Ok(());
    }
    uniform_kind(elements.into_iter())
}

/// Lexicographic comparison over columns that passed [`uniform_kind`]
fn compare_keys(a: &[Value], b: &[Value]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(left, right)| sort_compare(left, right).unwrap_or(Ordering::Equal))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
