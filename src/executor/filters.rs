//! Criteria evaluation
//!
//! All criteria are AND-ed and evaluated in declaration order. The first
//! criterion that fails short-circuits the record; the first error aborts
//! the whole execution.

use std::any::Any;
use std::sync::Arc;

use crate::query::{Condition, Criterion};
use crate::resolver::{CompiledPath, Field, Resolved};
use crate::shape::Shape;
use crate::storage::StoreKey;
use crate::store::{StoreError, StoreResult};
use crate::value::{compare, equal, is_in, CompareError, Value, ValueKind};

/// What a criterion reads from a record
#[derive(Debug, Clone)]
enum Target {
    Key,
    Path(Arc<CompiledPath>),
}

#[derive(Debug)]
struct CompiledCriterion<'q> {
    criterion: &'q Criterion,
    target: Target,
}

/// Compiled criteria for one record shape
#[derive(Debug)]
pub struct CriteriaFilter<'q> {
    criteria: Vec<CompiledCriterion<'q>>,
}

impl<'q> CriteriaFilter<'q> {
    /// Compiles every criterion path against `shape`.
    ///
    /// Unknown fields fail here, before any record is read.
    pub fn compile(shape: &'static Shape, criteria: &'q [Criterion]) -> StoreResult<Self> {
        let criteria = criteria
            .iter()
            .map(|criterion| {
                let target = match &criterion.field {
                    Field::Key => Target::Key,
                    Field::Path(path) => Target::Path(CompiledPath::compile(shape, path)?),
                };
                Ok(CompiledCriterion { criterion, target })
            })
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Self { criteria })
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// True when a criterion can fail on some records and pass on others:
    /// a match function, or a path through a pointer.
    pub fn fails_per_record(&self) -> bool {
        self.criteria.iter().any(|compiled| {
            matches!(compiled.criterion.condition, Condition::MatchFn(_))
                || matches!(&compiled.target, Target::Path(path) if path.crosses_pointer())
        })
    }

    /// Returns true if the record satisfies every criterion
    pub fn matches(&self, key: &StoreKey, record: &dyn Any) -> StoreResult<bool> {
        for compiled in &self.criteria {
            if !compiled.evaluate(key, record)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl CompiledCriterion<'_> {
    fn evaluate(&self, key: &StoreKey, record: &dyn Any) -> StoreResult<bool> {
        let negate = self.criterion.negate;
        let value = match &self.target {
            Target::Key => key.to_value(),
            Target::Path(path) => match path.walk(record)? {
                Resolved::Value(value) => value,
                Resolved::Nil => Value::Null,
                Resolved::Composite(_) => {
                    if matches!(self.criterion.condition, Condition::IsNil) {
                        return Ok(negate);
                    }
                    return Err(path.not_comparable().into());
                }
            },
        };
        let result = self.apply(&value)?;
        Ok(result != negate)
    }

    fn apply(&self, value: &Value) -> StoreResult<bool> {
        let field = &self.criterion.field;
        let mismatch = |err: CompareError| StoreError::type_mismatch(field.to_string(), err);

        match &self.criterion.condition {
            Condition::Eq(operand) => equal(value, operand).map_err(mismatch),
            Condition::Ne(operand) => equal(value, operand).map(|eq| !eq).map_err(mismatch),
            Condition::Gt(operand) => ordered(value, operand, |o| o.is_gt()).map_err(mismatch),
            Condition::Ge(operand) => ordered(value, operand, |o| o.is_ge()).map_err(mismatch),
            Condition::Lt(operand) => ordered(value, operand, |o| o.is_lt()).map_err(mismatch),
            Condition::Le(operand) => ordered(value, operand, |o| o.is_le()).map_err(mismatch),
            Condition::In(operands) => is_in(value, operands).map_err(mismatch),
            Condition::Matches(pattern) => {
                text(value, |s| pattern.is_match(s)).map_err(mismatch)
            }
            Condition::HasPrefix(prefix) => {
                text(value, |s| s.starts_with(prefix.as_str())).map_err(mismatch)
            }
            Condition::HasSuffix(suffix) => {
                text(value, |s| s.ends_with(suffix.as_str())).map_err(mismatch)
            }
            Condition::IsNil => Ok(value.is_null()),
            Condition::Contains(operand) => {
                list(value, |items| is_in(operand, items)).map_err(mismatch)
            }
            Condition::ContainsAny(operands) => list(value, |items| {
                for operand in operands {
                    if is_in(operand, items)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            })
            .map_err(mismatch),
            Condition::ContainsAll(operands) => list(value, |items| {
                for operand in operands {
                    if !is_in(operand, items)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            })
            .map_err(mismatch),
            Condition::MatchFn(predicate) => predicate(value)
                .map_err(|err| StoreError::match_func_failed(field.to_string(), err)),
        }
    }
}

/// Ordering test; a null on either side never matches
fn ordered(
    value: &Value,
    operand: &Value,
    accept: fn(std::cmp::Ordering) -> bool,
) -> Result<bool, CompareError> {
    if value.is_null() || operand.is_null() {
        return Ok(false);
    }
    compare(value, operand).map(accept)
}

/// String test; null never matches, other kinds are a mismatch
fn text(value: &Value, test: impl FnOnce(&str) -> bool) -> Result<bool, CompareError> {
    match value {
        Value::String(s) => Ok(test(s)),
        Value::Null => Ok(false),
        other => Err(CompareError::mismatch(
            "pattern matching",
            other.kind(),
            ValueKind::String,
        )),
    }
}

/// List test; null never matches, other kinds are a mismatch
fn list(
    value: &Value,
    test: impl FnOnce(&[Value]) -> Result<bool, CompareError>,
) -> Result<bool, CompareError> {
    match value {
        Value::List(items) => test(items),
        Value::Null => Ok(false),
        other => Err(CompareError::mismatch(
            "containment",
            other.kind(),
            ValueKind::List,
        )),
    }
}
