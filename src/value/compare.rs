//! Type-aware comparison over runtime values
//!
//! Values of one logical kind compare by value; values of different kinds
//! are a `TypeMismatch`. Numbers are the one kind with several
//! representations and are normalized before comparing.

use std::cmp::Ordering;

use super::errors::{CompareError, CompareResult};
use super::value::{Value, ValueKind};

/// Orders two values of the same logical kind.
///
/// `Null` only relates to `Null`.
pub fn compare(left: &Value, right: &Value) -> CompareResult<Ordering> {
    match (left, right) {
        (Value::Null, Value::Null) => Ok(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        (Value::Bytes(a), Value::Bytes(b)) => Ok(a.cmp(b)),
        (Value::Time(a), Value::Time(b)) => Ok(a.cmp(b)),
        (Value::Uuid(a), Value::Uuid(b)) => Ok(a.cmp(b)),
        (Value::List(a), Value::List(b)) => compare_lists(a, b),
        (a, b) if a.kind() == ValueKind::Number && b.kind() == ValueKind::Number => {
            Ok(compare_numbers(a, b))
        }
        (a, b) => Err(CompareError::mismatch("ordering", a.kind(), b.kind())),
    }
}

/// Equality under the comparator.
///
/// A null on exactly one side is unequal rather than a mismatch, so an
/// unset optional simply fails an equality filter.
pub fn equal(left: &Value, right: &Value) -> CompareResult<bool> {
    match (left, right) {
        (Value::Null, Value::Null) => Ok(true),
        (Value::Null, _) | (_, Value::Null) => Ok(false),
        _ => compare(left, right)
            .map(|ord| ord == Ordering::Equal)
            .map_err(|_| CompareError::mismatch("equality", left.kind(), right.kind())),
    }
}

/// Membership: true when `value` equals any operand.
pub fn is_in(value: &Value, operands: &[Value]) -> CompareResult<bool> {
    for operand in operands {
        if equal(value, operand)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Ordering used when sorting records.
///
/// Nulls sort before every other value; everything else defers to
/// [`compare`].
pub fn sort_compare(left: &Value, right: &Value) -> CompareResult<Ordering> {
    match (left, right) {
        (Value::Null, Value::Null) => Ok(Ordering::Equal),
        (Value::Null, _) => Ok(Ordering::Less),
        (_, Value::Null) => Ok(Ordering::Greater),
        _ => compare(left, right),
    }
}

fn compare_lists(left: &[Value], right: &[Value]) -> CompareResult<Ordering> {
    for (a, b) in left.iter().zip(right.iter()) {
        let ord = sort_compare(a, b)?;
        if ord != Ordering::Equal {
            return Ok(ord);
        }
    }
    Ok(left.len().cmp(&right.len()))
}

/// Compares two numeric values across representations.
///
/// Integers compare exactly through `i128`; as soon as a float is involved
/// both sides are compared as `f64`.
fn compare_numbers(left: &Value, right: &Value) -> Ordering {
    match (as_i128(left), as_i128(right)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => {
            let a = as_f64(left);
            let b = as_f64(right);
            a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
        }
    }
}

fn as_i128(value: &Value) -> Option<i128> {
    match value {
        Value::Int(i) => Some(*i as i128),
        Value::Uint(u) => Some(*u as i128),
        _ => None,
    }
}

fn as_f64(value: &Value) -> f64 {
    match value {
        Value::Int(i) => *i as f64,
        Value::Uint(u) => *u as f64,
        Value::Float(f) => *f,
        _ => f64::NAN,
    }
}
