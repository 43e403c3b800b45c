//! # roster-core
//!
//! Domain layer containing entities, the typed query model, projections,
//! auditing, and repository traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod auditing;
pub mod entities;
pub mod error;
pub mod projections;
pub mod query;
pub mod traits;
pub mod unit_of_work;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use auditing::{AuditContext, AuditorAware, FixedAuditor, RandomAuditor};
pub use entities::{AuditFields, Item, Member, MemberWithTeam, Persistable, Team};
pub use error::DomainError;
pub use projections::{
    MemberDto, MemberProjection, NestedClosedProjection, UsernameOnly, UsernameOnlyDto,
};
pub use query::{
    Direction, Example, ExampleMatcher, LockMode, MemberField, MemberProbe, NamedQuery, Order,
    Page, PageRequest, Slice, Sort, Specification, StringMatcher, TeamField,
};
pub use traits::{
    CrudRepository, ItemRepository, MemberRepository, MemberRepositoryCustom, PagingRepository,
    QueryByExampleExecutor, RepoResult, SpecificationExecutor, TeamRepository,
};
pub use unit_of_work::IdentityMap;
pub use value_objects::{IdParseError, MemberId, TeamId};
