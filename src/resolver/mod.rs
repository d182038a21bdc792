//! Field path resolution
//!
//! Turns a dotted path such as `L2.L3.Name` into a compiled sequence of
//! accessor steps for one shape, then walks records with it.
//!
//! # Resolution rules
//!
//! 1. Each segment is looked up by exact name at its level
//! 2. A single unqualified segment not found directly is searched for in
//!    embedded components, in declaration order; the first match wins
//! 3. Pointer fields are dereferenced before the next segment; a nil
//!    pointer with segments left is `FieldNotFound`
//! 4. The record key is not a field and never resolves here
//!
//! Compiled paths are cached on the shape they were compiled against.

mod compiled;
mod errors;
mod field;

pub(crate) use compiled::Resolved;
pub use compiled::{CompiledPath, FieldResolver, Step, StepKind};
pub use errors::{ResolveError, ResolveResult};
pub use field::{Field, FieldPath, KEY};
