//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in roster-core.
//! The member repository also implements `MemberRepositoryCustom`, and
//! `PgMemberQueryRepository` holds read-only screen queries.

pub(crate) mod error;
mod item;
mod member;
mod member_custom;
mod member_query;
mod projection;
mod team;

pub use item::PgItemRepository;
pub use member::PgMemberRepository;
pub use member_query::PgMemberQueryRepository;
pub use projection::ClosedProjection;
pub use team::PgTeamRepository;
