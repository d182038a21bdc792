//! Query execution
//!
//! Turns a [`QueryPlan`](crate::planner::QueryPlan) into a [`MatchWindow`]:
//! candidates from the planned scan, criteria filtering, stable multi-key
//! sorting with whole-sequence reversal, then skip and limit.
//!
//! # Invariants
//!
//! - Criteria are AND-ed and evaluated in declaration order
//! - Any evaluation error aborts the execution; no partial window is returned
//! - Records tying on every sort field keep their primary key order
//! - Checksums are validated on every record read

mod executor;
mod filters;
mod sorter;
mod window;

pub use executor::{MatchWindow, QueryExecutor};
pub use filters::CriteriaFilter;
pub use sorter::SortOrdering;
pub use window::Window;
