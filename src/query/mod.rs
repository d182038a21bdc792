//! Declarative queries
//!
//! A [`Query`] is an ordered list of AND-ed criteria plus sort fields, a
//! reverse flag, skip and limit. It is built fluently:
//!
//! ```ignore
//! let query = Query::filter("Category").eq("animal")
//!     .and("ID").is_in([8, 3, 13])
//!     .sort_by(["Category", "Name"])
//!     .reverse()
//!     .skip(2)
//!     .limit(3);
//! ```
//!
//! Criteria are always conjunctive; there is no OR.

mod ast;
mod builder;

pub use ast::{BoxError, Condition, Criterion, MatchFn, Query};
pub use builder::CriterionBuilder;
