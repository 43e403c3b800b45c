//! Typed query model
//!
//! Everything a repository needs to know about a query beyond its fixed SQL:
//! which fields it filters and sorts on, which page it wants, and which
//! row lock it takes. Nothing here talks to a database.

mod example;
mod field;
mod lock;
pub mod member_spec;
mod named;
mod page;
mod sort;
mod specification;

pub use example::{Example, ExampleMatcher, ExampleProbe, MemberProbe, TeamProbe};
pub use field::{Field, Join, MemberField, TeamField, MEMBER_TEAM_JOIN};
pub use lock::LockMode;
pub use named::NamedQuery;
pub use page::{Page, PageRequest, Slice};
pub use sort::{Direction, Order, Sort};
pub use specification::{like_pattern, Criterion, Operator, Specification, StringMatcher, Value};
