//! Runtime values and the comparator
//!
//! Every field a query touches is first resolved to a [`Value`]. The
//! comparator relates two values of the same logical kind, whatever their
//! concrete representation (an `i8` field against an `i64` operand, an
//! integer against a float).
//!
//! # Rules
//!
//! - Numbers normalize across integer widths and floats
//! - Strings and bytes compare exactly
//! - Differing kinds are a `TypeMismatch`, never a silent `false`
//! - The comparator knows nothing about records or paths

mod compare;
mod errors;
mod value;

pub use compare::{compare, equal, is_in, sort_compare};
pub use errors::{CompareError, CompareResult};
pub use value::{Value, ValueKind};
