//! Query structures

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::resolver::Field;
use crate::value::Value;

use super::builder::CriterionBuilder;

/// Boxed error returned by caller-supplied callbacks
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Caller predicate over a resolved field value
pub type MatchFn = Arc<dyn Fn(&Value) -> Result<bool, BoxError> + Send + Sync>;

/// Operator and operand(s) of one criterion
#[derive(Clone)]
pub enum Condition {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Ge(Value),
    Lt(Value),
    Le(Value),
    /// Equal to any operand
    In(Vec<Value>),
    /// String field matches the pattern
    Matches(Regex),
    HasPrefix(String),
    HasSuffix(String),
    /// Unset optional or nil reference
    IsNil,
    /// List field has an element equal to the operand
    Contains(Value),
    ContainsAny(Vec<Value>),
    ContainsAll(Vec<Value>),
    MatchFn(MatchFn),
}

impl Condition {
    /// Returns the operator name for logs and errors
    pub fn op_name(&self) -> &'static str {
        match self {
            Condition::Eq(_) => "eq",
            Condition::Ne(_) => "ne",
            Condition::Gt(_) => "gt",
            Condition::Ge(_) => "ge",
            Condition::Lt(_) => "lt",
            Condition::Le(_) => "le",
            Condition::In(_) => "in",
            Condition::Matches(_) => "matches",
            Condition::HasPrefix(_) => "has_prefix",
            Condition::HasSuffix(_) => "has_suffix",
            Condition::IsNil => "is_nil",
            Condition::Contains(_) => "contains",
            Condition::ContainsAny(_) => "contains_any",
            Condition::ContainsAll(_) => "contains_all",
            Condition::MatchFn(_) => "match_fn",
        }
    }

    /// Returns true if this is an equality operation
    pub fn is_equality(&self) -> bool {
        matches!(self, Condition::Eq(_))
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Eq(v)
            | Condition::Ne(v)
            | Condition::Gt(v)
            | Condition::Ge(v)
            | Condition::Lt(v)
            | Condition::Le(v)
            | Condition::Contains(v) => write!(f, "{}({})", self.op_name(), v),
            Condition::In(vs) | Condition::ContainsAny(vs) | Condition::ContainsAll(vs) => {
                write!(f, "{}({})", self.op_name(), Value::List(vs.clone()))
            }
            Condition::Matches(re) => write!(f, "matches({})", re.as_str()),
            Condition::HasPrefix(s) | Condition::HasSuffix(s) => {
                write!(f, "{}({:?})", self.op_name(), s)
            }
            Condition::IsNil => write!(f, "is_nil"),
            Condition::MatchFn(_) => write!(f, "match_fn(..)"),
        }
    }
}

/// A single criterion: field, condition, optional negation
#[derive(Debug, Clone)]
pub struct Criterion {
    pub field: Field,
    pub condition: Condition,
    pub negate: bool,
}

impl Criterion {
    /// Returns true for a non-negated equality on the primary key
    pub fn is_primary_key(&self) -> bool {
        self.field.is_key() && self.condition.is_equality() && !self.negate
    }
}

/// A full query: criteria (AND), sort fields, reverse, skip, limit.
///
/// A limit of zero means unlimited.
#[derive(Debug, Clone, Default)]
pub struct Query {
    criteria: Vec<Criterion>,
    sort: Vec<Field>,
    reverse: bool,
    skip: usize,
    limit: usize,
}

impl Query {
    /// A query matching every record
    pub fn all() -> Self {
        Self::default()
    }

    /// Starts a query with a criterion on `field`
    pub fn filter(field: impl Into<Field>) -> CriterionBuilder {
        CriterionBuilder::new(Self::default(), field.into())
    }

    /// Appends another AND-ed criterion on `field`
    pub fn and(self, field: impl Into<Field>) -> CriterionBuilder {
        CriterionBuilder::new(self, field.into())
    }

    /// Sets the sort fields, dropping repeats while keeping first occurrences
    pub fn sort_by<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        self.sort.clear();
        for field in fields {
            let field = field.into();
            if !self.sort.contains(&field) {
                self.sort.push(field);
            }
        }
        self
    }

    /// Toggles whole-sequence reversal of the sorted result
    pub fn reverse(mut self) -> Self {
        self.reverse = !self.reverse;
        self
    }

    /// Drops the first `n` matches
    pub fn skip(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    /// Keeps at most `n` matches; zero means unlimited
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = n;
        self
    }

    pub(crate) fn push(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn sort_fields(&self) -> &[Field] {
        &self.sort
    }

    pub fn is_reversed(&self) -> bool {
        self.reverse
    }

    pub fn skip_count(&self) -> usize {
        self.skip
    }

    pub fn limit_count(&self) -> usize {
        self.limit
    }
}
