//! Rendering of the typed query model into PostgreSQL
//!
//! Every value ends up as a bind parameter; only column names, aliases and
//! keywords taken from the [`Field`] definitions are written into the SQL
//! text.

use sqlx::{Postgres, QueryBuilder};

use roster_core::query::{
    Criterion, Field, Join, LockMode, Operator, PageRequest, Sort, Specification, Value,
};

/// Builder used by every dynamic query in this crate
pub type PgQueryBuilder = QueryBuilder<'static, Postgres>;

/// Join flavour written for an association
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

impl JoinKind {
    fn sql(self) -> &'static str {
        match self {
            Self::Inner => " INNER JOIN ",
            Self::Left => " LEFT JOIN ",
        }
    }
}

/// Append ` <kind> JOIN table alias ON ...` for each join
pub fn push_joins(qb: &mut PgQueryBuilder, joins: &[Join], kind: JoinKind) {
    for join in joins {
        qb.push(kind.sql())
            .push(join.table)
            .push(" ")
            .push(join.alias)
            .push(" ON ")
            .push(join.on);
    }
}

/// Joins for a filtered and sorted query.
///
/// A join is inner only when a null-rejecting filter condition in the
/// top-level conjunction needs it. Everything else, including fields under
/// `OR`, `NOT`, `IS NULL` and fields only used for sorting, is reached through
/// a left join so rows without the association are kept.
pub fn push_query_joins<F: Field>(
    qb: &mut PgQueryBuilder,
    spec: &Specification<F>,
    sort: &Sort<F>,
) {
    let inner = spec.inner_joins();
    let mut left: Vec<Join> = Vec::new();
    for join in spec.required_joins().into_iter().chain(sort.required_joins()) {
        if !inner.contains(&join) && !left.contains(&join) {
            left.push(join);
        }
    }
    push_joins(qb, &inner, JoinKind::Inner);
    push_joins(qb, &left, JoinKind::Left);
}

/// Append ` WHERE ...` unless the specification is unrestricted
pub fn push_where<F: Field>(qb: &mut PgQueryBuilder, spec: &Specification<F>) {
    if spec.is_unrestricted() {
        return;
    }
    qb.push(" WHERE ");
    push_specification(qb, spec);
}

/// Append the boolean expression for `spec`
pub fn push_specification<F: Field>(qb: &mut PgQueryBuilder, spec: &Specification<F>) {
    match spec {
        Specification::Condition(criterion) => push_criterion(qb, criterion),
        Specification::All(parts) => push_group(qb, parts, " AND ", "TRUE"),
        Specification::Any(parts) => push_group(qb, parts, " OR ", "FALSE"),
        // complement: rows where the inner condition is unknown match too
        Specification::Not(inner) => {
            qb.push("(");
            push_specification(qb, inner);
            qb.push(") IS NOT TRUE");
        }
    }
}

fn push_group<F: Field>(
    qb: &mut PgQueryBuilder,
    parts: &[Specification<F>],
    separator: &str,
    empty: &str,
) {
    match parts {
        [] => {
            qb.push(empty);
        }
        [single] => push_specification(qb, single),
        _ => {
            qb.push("(");
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    qb.push(separator);
                }
                push_specification(qb, part);
            }
            qb.push(")");
        }
    }
}

fn push_column<F: Field>(qb: &mut PgQueryBuilder, field: F, lower: bool) {
    if lower {
        qb.push("LOWER(").push(field.column()).push(")");
    } else {
        qb.push(field.column());
    }
}

fn push_criterion<F: Field>(qb: &mut PgQueryBuilder, criterion: &Criterion<F>) {
    let lower = criterion.ignore_case && matches!(criterion.value, Value::Text(_));

    match (criterion.operator, &criterion.value) {
        (Operator::IsNull, _) | (Operator::Eq, Value::Null) => {
            push_column(qb, criterion.field, false);
            qb.push(" IS NULL");
        }
        (Operator::IsNotNull, _) | (Operator::Ne, Value::Null) => {
            push_column(qb, criterion.field, false);
            qb.push(" IS NOT NULL");
        }
        (Operator::In, Value::IntList(values)) if values.is_empty() => {
            qb.push("FALSE");
        }
        (Operator::In, Value::TextList(values)) if values.is_empty() => {
            qb.push("FALSE");
        }
        (Operator::In, list @ (Value::IntList(_) | Value::TextList(_))) => {
            push_column(qb, criterion.field, false);
            qb.push(" = ANY(");
            push_value(qb, list);
            qb.push(")");
        }
        (Operator::In, value) => {
            push_column(qb, criterion.field, lower);
            qb.push(" = ");
            push_bound(qb, value, lower);
        }
        (operator, value) => {
            push_column(qb, criterion.field, lower);
            qb.push(" ").push(operator.sql()).push(" ");
            push_bound(qb, value, lower);
        }
    }
}

fn push_bound(qb: &mut PgQueryBuilder, value: &Value, lower: bool) {
    if lower {
        qb.push("LOWER(");
        push_value(qb, value);
        qb.push(")");
    } else {
        push_value(qb, value);
    }
}

/// Bind one value
pub fn push_value(qb: &mut PgQueryBuilder, value: &Value) {
    match value {
        Value::Null => {
            qb.push("NULL");
        }
        Value::Int(v) => {
            qb.push_bind(*v);
        }
        Value::Text(v) => {
            qb.push_bind(v.clone());
        }
        Value::Timestamp(v) => {
            qb.push_bind(*v);
        }
        Value::IntList(v) => {
            qb.push_bind(v.clone());
        }
        Value::TextList(v) => {
            qb.push_bind(v.clone());
        }
    }
}

/// Append ` ORDER BY ...`, falling back to `fallback` when unsorted
pub fn push_order_by<F: Field>(qb: &mut PgQueryBuilder, sort: &Sort<F>, fallback: Option<&str>) {
    if sort.is_sorted() {
        qb.push(" ORDER BY ");
        for (i, order) in sort.orders().iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(order.field.column())
                .push(" ")
                .push(order.direction.sql());
        }
    } else if let Some(fallback) = fallback {
        qb.push(" ORDER BY ").push(fallback);
    }
}

/// Append ` LIMIT $n OFFSET $m` for one page
pub fn push_page<F: Field>(qb: &mut PgQueryBuilder, request: &PageRequest<F>) {
    push_window(qb, request.limit(), request.offset());
}

/// Append ` LIMIT $n OFFSET $m` for one slice, one row past the page
pub fn push_slice<F: Field>(qb: &mut PgQueryBuilder, request: &PageRequest<F>) {
    push_window(qb, request.overfetch_limit(), request.offset());
}

fn push_window(qb: &mut PgQueryBuilder, limit: i64, offset: i64) {
    qb.push(" LIMIT ").push_bind(limit);
    qb.push(" OFFSET ").push_bind(offset);
}

/// Append the row-locking clause, if any
pub fn push_lock(qb: &mut PgQueryBuilder, lock: LockMode) {
    if let Some(clause) = lock.sql() {
        qb.push(" ").push(clause);
    }
}
