//! Sort orders over typed fields

use std::str::FromStr;

use crate::error::DomainError;

use super::field::{Field, Join};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(DomainError::InvalidSort(format!("unknown direction '{other}'"))),
        }
    }
}

/// One field/direction pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order<F> {
    pub field: F,
    pub direction: Direction,
}

impl<F: Field> Order<F> {
    pub fn asc(field: F) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: F) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }
}

/// Ordered list of sort orders.
///
/// Pagination over an unsorted or non-unique order is not deterministic:
/// rows with equal keys may move between pages from one query to the next.
/// Callers who page through data should end the sort with a unique field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort<F> {
    orders: Vec<Order<F>>,
}

impl<F> Default for Sort<F> {
    fn default() -> Self {
        Self { orders: Vec::new() }
    }
}

impl<F: Field> Sort<F> {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(field: F, direction: Direction) -> Self {
        Self {
            orders: vec![Order { field, direction }],
        }
    }

    pub fn asc(field: F) -> Self {
        Self::by(field, Direction::Asc)
    }

    pub fn desc(field: F) -> Self {
        Self::by(field, Direction::Desc)
    }

    /// Append a tie-breaking order
    pub fn and(mut self, order: Order<F>) -> Self {
        self.orders.push(order);
        self
    }

    pub fn orders(&self) -> &[Order<F>] {
        &self.orders
    }

    pub fn is_sorted(&self) -> bool {
        !self.orders.is_empty()
    }

    /// Joins needed by the sorted fields, in first-use order
    pub fn required_joins(&self) -> Vec<Join> {
        let mut joins = Vec::new();
        for join in self.orders.iter().filter_map(|order| order.field.join()) {
            if !joins.contains(&join) {
                joins.push(join);
            }
        }
        joins
    }

    /// Parse `property[,asc|desc]` terms separated by `;`.
    ///
    /// Empty input yields an unsorted value. Unknown properties or
    /// directions are rejected rather than silently dropped.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let mut orders = Vec::new();
        for term in input.split(';').map(str::trim).filter(|t| !t.is_empty()) {
            let mut parts = term.splitn(2, ',');
            let property = parts.next().unwrap_or_default();
            let field = property.parse::<F>()?;
            let direction = match parts.next() {
                Some(direction) => direction.parse()?,
                None => Direction::Asc,
            };
            orders.push(Order { field, direction });
        }
        Ok(Self { orders })
    }
}
