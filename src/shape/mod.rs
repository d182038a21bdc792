//! Static shape descriptions of record types
//!
//! A shape lists the addressable fields of one composite type together with
//! typed accessors for them. Field paths are compiled against shapes instead
//! of re-walking type metadata on every evaluation.
//!
//! # Field kinds
//!
//! - Scalar: read as a [`Value`](crate::value::Value)
//! - Nested: a composite reached by name
//! - Embedded: a nested composite whose fields are promoted to the parent
//! - Pointer: an optional composite; unset means nil
//!
//! Promotion is explicit: only fields registered with
//! [`ShapeBuilder::embedded`] take part in it.

mod builder;
mod record;
mod shape;

pub use builder::ShapeBuilder;
pub use record::{Record, Shaped};
pub use shape::{FieldDef, IndexDef, Shape};

pub(crate) use shape::{Access, Reach};
