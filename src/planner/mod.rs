//! Query planner
//!
//! Compiles a query against a record shape and picks how candidates are
//! read from storage. Planning touches no storage, so unknown fields and a
//! sort on the record key are caught even when the bucket is empty.
//!
//! # Scan Selection Priority (strict order)
//!
//! 1. Primary key equality
//! 2. Equality on a field with a declared index (when indexes are enabled)
//! 3. Full scan in key order
//!
//! Ties between indexes are broken lexicographically by index name. The
//! chosen scan only narrows candidates; every criterion is still evaluated
//! on every candidate.

mod planner;

pub use planner::{QueryPlan, QueryPlanner, ScanType};
