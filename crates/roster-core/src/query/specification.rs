//! Composable filter predicates
//!
//! A [`Specification`] is a tree of field/operator/value conditions joined
//! with `AND`, `OR` and `NOT`. It is only ever translated into a SQL `WHERE`
//! clause; nothing filters rows in memory after they are fetched.

use chrono::{DateTime, Utc};

use crate::value_objects::{MemberId, TeamId};

use super::field::{Field, Join};

/// Comparison operators supported by the query builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    In,
    IsNull,
    IsNotNull,
}

impl Operator {
    /// SQL token for binary operators
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Like => "LIKE",
            Self::In => "IN",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
        }
    }
}

/// A bindable query value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
    IntList(Vec<i64>),
    TextList(Vec<String>),
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl From<MemberId> for Value {
    fn from(v: MemberId) -> Self {
        Self::Int(v.into_inner())
    }
}

impl From<TeamId> for Value {
    fn from(v: TeamId) -> Self {
        Self::Int(v.into_inner())
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Self::TextList(v)
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Self::IntList(v)
    }
}

/// One `field operator value` condition
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion<F> {
    pub field: F,
    pub operator: Operator,
    pub value: Value,
    /// Compare text case-insensitively (`LOWER(column) op LOWER(value)`)
    pub ignore_case: bool,
}

/// Composable predicate over the fields `F` of one entity
#[derive(Debug, Clone, PartialEq)]
pub enum Specification<F> {
    Condition(Criterion<F>),
    /// Conjunction; empty matches every row
    All(Vec<Specification<F>>),
    /// Disjunction; empty matches no row
    Any(Vec<Specification<F>>),
    /// Complement; a row whose inner condition is unknown (NULL) matches
    Not(Box<Specification<F>>),
}

impl<F: Field> Specification<F> {
    /// Matches every row
    pub fn all() -> Self {
        Self::All(Vec::new())
    }

    fn criterion(field: F, operator: Operator, value: Value) -> Self {
        Self::Condition(Criterion {
            field,
            operator,
            value,
            ignore_case: false,
        })
    }

    pub fn eq(field: F, value: impl Into<Value>) -> Self {
        Self::criterion(field, Operator::Eq, value.into())
    }

    pub fn eq_ignore_case(field: F, value: impl Into<String>) -> Self {
        Self::Condition(Criterion {
            field,
            operator: Operator::Eq,
            value: Value::Text(value.into()),
            ignore_case: true,
        })
    }

    pub fn ne(field: F, value: impl Into<Value>) -> Self {
        Self::criterion(field, Operator::Ne, value.into())
    }

    pub fn gt(field: F, value: impl Into<Value>) -> Self {
        Self::criterion(field, Operator::Gt, value.into())
    }

    pub fn ge(field: F, value: impl Into<Value>) -> Self {
        Self::criterion(field, Operator::Ge, value.into())
    }

    pub fn lt(field: F, value: impl Into<Value>) -> Self {
        Self::criterion(field, Operator::Lt, value.into())
    }

    pub fn le(field: F, value: impl Into<Value>) -> Self {
        Self::criterion(field, Operator::Le, value.into())
    }

    /// `LIKE` with a caller-built pattern; see [`like_pattern`]
    pub fn like(field: F, pattern: impl Into<String>, ignore_case: bool) -> Self {
        Self::Condition(Criterion {
            field,
            operator: Operator::Like,
            value: Value::Text(pattern.into()),
            ignore_case,
        })
    }

    /// Membership test; an empty list matches no row
    pub fn is_in(field: F, values: impl Into<Value>) -> Self {
        Self::criterion(field, Operator::In, values.into())
    }

    pub fn is_null(field: F) -> Self {
        Self::criterion(field, Operator::IsNull, Value::Null)
    }

    pub fn is_not_null(field: F) -> Self {
        Self::criterion(field, Operator::IsNotNull, Value::Null)
    }

    /// Conjunction. Nested conjunctions are flattened, so
    /// `a.and(b).and(c)` and `a.and(b.and(c))` build the same tree.
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::All(mut left), Self::All(right)) => {
                left.extend(right);
                Self::All(left)
            }
            (Self::All(mut left), right) => {
                left.push(right);
                Self::All(left)
            }
            (left, Self::All(mut right)) => {
                right.insert(0, left);
                Self::All(right)
            }
            (left, right) => Self::All(vec![left, right]),
        }
    }

    /// Disjunction, flattened the same way as [`and`](Self::and)
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Any(mut left), Self::Any(right)) => {
                left.extend(right);
                Self::Any(left)
            }
            (Self::Any(mut left), right) => {
                left.push(right);
                Self::Any(left)
            }
            (left, Self::Any(mut right)) => {
                right.insert(0, left);
                Self::Any(right)
            }
            (left, right) => Self::Any(vec![left, right]),
        }
    }

    /// Negation; a double negation collapses
    pub fn not(self) -> Self {
        match self {
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }

    /// Whether this specification constrains anything
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::All(parts) if parts.iter().all(Self::is_unrestricted))
    }

    /// Joins needed by the fields referenced anywhere in the tree, in first-use order
    pub fn required_joins(&self) -> Vec<Join> {
        let mut joins = Vec::new();
        self.collect_joins(&mut joins);
        joins
    }

    fn collect_joins(&self, joins: &mut Vec<Join>) {
        match self {
            Self::Condition(criterion) => {
                if let Some(join) = criterion.field.join() {
                    if !joins.contains(&join) {
                        joins.push(join);
                    }
                }
            }
            Self::All(parts) | Self::Any(parts) => {
                for part in parts {
                    part.collect_joins(joins);
                }
            }
            Self::Not(inner) => inner.collect_joins(joins),
        }
    }

    /// Joins that may be inner joins without changing the result.
    ///
    /// Only a null-rejecting condition reached through conjunctions alone
    /// qualifies. A field under `Any` or `Not`, or tested with `IS NULL`, must
    /// be reached through an outer join or rows without the association
    /// disappear.
    pub fn inner_joins(&self) -> Vec<Join> {
        let mut joins = Vec::new();
        self.collect_inner_joins(&mut joins);
        joins
    }

    fn collect_inner_joins(&self, joins: &mut Vec<Join>) {
        match self {
            Self::Condition(criterion) if criterion.rejects_null() => {
                if let Some(join) = criterion.field.join() {
                    if !joins.contains(&join) {
                        joins.push(join);
                    }
                }
            }
            Self::All(parts) => {
                for part in parts {
                    part.collect_inner_joins(joins);
                }
            }
            Self::Condition(_) | Self::Any(_) | Self::Not(_) => {}
        }
    }
}

impl<F> Criterion<F> {
    /// Whether a row whose column is NULL can never satisfy this condition
    pub fn rejects_null(&self) -> bool {
        !matches!(
            (self.operator, &self.value),
            (Operator::IsNull, _) | (Operator::Eq, Value::Null)
        )
    }
}

impl<F: Field> Default for Specification<F> {
    fn default() -> Self {
        Self::all()
    }
}

/// How text values of a probe are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringMatcher {
    #[default]
    Exact,
    Starting,
    Ending,
    Containing,
}

/// Build a `LIKE` pattern, escaping wildcard characters in `value`
pub fn like_pattern(value: &str, matcher: StringMatcher) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    match matcher {
        StringMatcher::Exact => escaped,
        StringMatcher::Starting => format!("{escaped}%"),
        StringMatcher::Ending => format!("%{escaped}"),
        StringMatcher::Containing => format!("%{escaped}%"),
    }
}
