//! Fluent criterion builder

use std::sync::Arc;

use regex::Regex;

use crate::resolver::Field;
use crate::value::Value;

use super::ast::{BoxError, Condition, Criterion, Query};

/// Pending criterion on one field.
///
/// Every operator method finishes the criterion and hands back the query.
#[derive(Debug)]
pub struct CriterionBuilder {
    query: Query,
    field: Field,
    negate: bool,
}

impl CriterionBuilder {
    pub(crate) fn new(query: Query, field: Field) -> Self {
        Self {
            query,
            field,
            negate: false,
        }
    }

    /// Inverts the result of the next operator
    pub fn not(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    fn finish(self, condition: Condition) -> Query {
        let criterion = Criterion {
            field: self.field,
            condition,
            negate: self.negate,
        };
        self.query.push(criterion)
    }

    pub fn eq(self, value: impl Into<Value>) -> Query {
        self.finish(Condition::Eq(value.into()))
    }

    pub fn ne(self, value: impl Into<Value>) -> Query {
        self.finish(Condition::Ne(value.into()))
    }

    pub fn gt(self, value: impl Into<Value>) -> Query {
        self.finish(Condition::Gt(value.into()))
    }

    pub fn ge(self, value: impl Into<Value>) -> Query {
        self.finish(Condition::Ge(value.into()))
    }

    pub fn lt(self, value: impl Into<Value>) -> Query {
        self.finish(Condition::Lt(value.into()))
    }

    pub fn le(self, value: impl Into<Value>) -> Query {
        self.finish(Condition::Le(value.into()))
    }

    /// Field equals any of `values`
    pub fn is_in<I, V>(self, values: I) -> Query
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.finish(Condition::In(collect(values)))
    }

    /// String field matches `pattern`
    pub fn matches(self, pattern: Regex) -> Query {
        self.finish(Condition::Matches(pattern))
    }

    pub fn has_prefix(self, prefix: impl Into<String>) -> Query {
        self.finish(Condition::HasPrefix(prefix.into()))
    }

    pub fn has_suffix(self, suffix: impl Into<String>) -> Query {
        self.finish(Condition::HasSuffix(suffix.into()))
    }

    pub fn is_nil(self) -> Query {
        self.finish(Condition::IsNil)
    }

    /// List field contains `value`
    pub fn contains(self, value: impl Into<Value>) -> Query {
        self.finish(Condition::Contains(value.into()))
    }

    pub fn contains_any<I, V>(self, values: I) -> Query
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.finish(Condition::ContainsAny(collect(values)))
    }

    pub fn contains_all<I, V>(self, values: I) -> Query
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.finish(Condition::ContainsAll(collect(values)))
    }

    /// Field value satisfies `predicate`; its errors abort the query
    pub fn match_fn<F>(self, predicate: F) -> Query
    where
        F: Fn(&Value) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        self.finish(Condition::MatchFn(Arc::new(predicate)))
    }
}

fn collect<I, V>(values: I) -> Vec<Value>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    values.into_iter().map(Into::into).collect()
}
