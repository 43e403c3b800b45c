//! Axum extractors for request handling
//!
//! Custom extractors for the acting user, validation, paging and path ids.

mod actor;
mod pageable;
mod path;
mod validated;

pub use actor::{Actor, ACTOR_HEADER};
pub use pageable::{Pageable, PageableParams, DEFAULT_PAGE_SIZE, DEFAULT_SORT, MAX_PAGE_SIZE};
pub use path::MemberIdPath;
pub use validated::ValidatedJson;
