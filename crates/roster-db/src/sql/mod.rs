//! SQL building blocks
//!
//! `render` turns specifications, sorts, pages and lock modes into SQL
//! fragments. `queries` holds the explicit, named member queries. `member`
//! and `team` hold statements that both the pooled repositories and the
//! session execute.

pub mod member;
pub mod queries;
pub mod render;
pub mod team;

pub use queries::{MemberQueries, MEMBER_COLUMNS};
pub use render::{JoinKind, PgQueryBuilder};
