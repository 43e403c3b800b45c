//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.
//!
//! Every query a repository runs is spelled out here as a method with typed
//! parameters. There is no derivation of queries from method names; the
//! implementation writes the SQL for each finder.

use async_trait::async_trait;

use crate::auditing::AuditContext;
use crate::entities::{Item, Member, MemberWithTeam, Team};
use crate::error::DomainError;
use crate::projections::{MemberDto, MemberProjection, UsernameOnly, UsernameOnlyDto};
use crate::query::{
    Example, ExampleProbe, Field, MemberField, MemberProbe, Page, PageRequest, Slice, Sort,
    Specification,
};
use crate::value_objects::{MemberId, TeamId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Generic Contracts
// ============================================================================

/// Basic create/read/delete operations for one entity type
#[async_trait]
pub trait CrudRepository<E, ID>: Send + Sync
where
    E: Send + Sync + 'static,
    ID: Send + Sync + 'static,
{
    /// Insert a new entity or merge a persisted one, returning the stored state.
    ///
    /// New entities receive their key and all four audit columns; persisted
    /// ones only have the `last_modified_*` pair refreshed.
    async fn save(&self, entity: E, audit: &AuditContext) -> RepoResult<E>;

    /// Save several entities with the same audit context
    async fn save_all(&self, entities: Vec<E>, audit: &AuditContext) -> RepoResult<Vec<E>> {
        let mut saved = Vec::with_capacity(entities.len());
        for entity in entities {
            saved.push(self.save(entity, audit).await?);
        }
        Ok(saved)
    }

    /// Find an entity by key; `None` when absent
    async fn find_by_id(&self, id: ID) -> RepoResult<Option<E>>;

    async fn exists_by_id(&self, id: ID) -> RepoResult<bool>;

    async fn find_all(&self) -> RepoResult<Vec<E>>;

    async fn count(&self) -> RepoResult<i64>;

    /// Delete a persisted entity.
    ///
    /// Fails with `TransientEntity` for an entity that was never saved and
    /// with the entity's not-found error when the row no longer exists.
    async fn delete(&self, entity: &E) -> RepoResult<()>;

    /// Delete by key; an absent row is reported as not found
    async fn delete_by_id(&self, id: ID) -> RepoResult<()>;
}

/// Sorted and paged listing of every entity
#[async_trait]
pub trait PagingRepository<E, F>: Send + Sync
where
    E: Send + Sync + 'static,
    F: Field,
{
    async fn find_all_sorted(&self, sort: &Sort<F>) -> RepoResult<Vec<E>>;

    /// One page of all entities plus the total count
    async fn find_all_paged(&self, request: &PageRequest<F>) -> RepoResult<Page<E>>;
}

/// Filtering by composable specifications
#[async_trait]
pub trait SpecificationExecutor<E, F>: Send + Sync
where
    E: Send + Sync + 'static,
    F: Field,
{
    async fn find_all_by_spec(&self, spec: &Specification<F>) -> RepoResult<Vec<E>>;

    /// At most one match; several matches fail with `NonUniqueResult`
    async fn find_one_by_spec(&self, spec: &Specification<F>) -> RepoResult<Option<E>>;

    async fn count_by_spec(&self, spec: &Specification<F>) -> RepoResult<i64>;

    async fn find_all_by_spec_paged(
        &self,
        spec: &Specification<F>,
        request: &PageRequest<F>,
    ) -> RepoResult<Page<E>>;
}

/// Filtering by example probes. Association properties of a probe are
/// matched through inner joins only.
#[async_trait]
pub trait QueryByExampleExecutor<E, P>: Send + Sync
where
    E: Send + Sync + 'static,
    P: ExampleProbe + Send + Sync + 'static,
{
    async fn find_all_by_example(&self, example: &Example<P>) -> RepoResult<Vec<E>>;

    async fn count_by_example(&self, example: &Example<P>) -> RepoResult<i64>;

    async fn exists_by_example(&self, example: &Example<P>) -> RepoResult<bool>;
}

// ============================================================================
// Member Repository
// ============================================================================

/// Hand-written member queries implemented alongside the standard contract
#[async_trait]
pub trait MemberRepositoryCustom: Send + Sync {
    async fn find_member_custom(&self) -> RepoResult<Vec<Member>>;
}

#[async_trait]
pub trait MemberRepository:
    CrudRepository<Member, MemberId>
    + PagingRepository<Member, MemberField>
    + SpecificationExecutor<Member, MemberField>
    + QueryByExampleExecutor<Member, MemberProbe>
    + MemberRepositoryCustom
{
    /// Members with this username and an age strictly greater than `age`
    async fn find_by_username_and_age_greater_than(
        &self,
        username: &str,
        age: i32,
    ) -> RepoResult<Vec<Member>>;

    /// First three members by key
    async fn find_top3(&self) -> RepoResult<Vec<Member>>;

    /// Named query `member.find_by_username`
    async fn find_by_username(&self, username: &str) -> RepoResult<Vec<Member>>;

    /// Explicit query matching both username and age
    async fn find_user(&self, username: &str, age: i32) -> RepoResult<Vec<Member>>;

    async fn find_username_list(&self) -> RepoResult<Vec<String>>;

    /// Members that have a team, with the team name (inner join)
    async fn find_member_dto(&self) -> RepoResult<Vec<MemberDto>>;

    /// Members whose username is in `names`; an empty list matches nothing
    async fn find_by_names(&self, names: &[String]) -> RepoResult<Vec<Member>>;

    async fn find_list_by_username(&self, username: &str) -> RepoResult<Vec<Member>>;

    /// Single-result finder; several matches fail with `NonUniqueResult`
    async fn find_member_by_username(&self, username: &str) -> RepoResult<Option<Member>>;

    /// Same contract as [`find_member_by_username`](Self::find_member_by_username)
    async fn find_optional_by_username(&self, username: &str) -> RepoResult<Option<Member>>;

    /// Page of members with exactly this age
    async fn find_by_age(
        &self,
        age: i32,
        request: &PageRequest<MemberField>,
    ) -> RepoResult<Page<Member>>;

    /// Slice of members with exactly this age; no count query is issued
    async fn find_slice_by_age(
        &self,
        age: i32,
        request: &PageRequest<MemberField>,
    ) -> RepoResult<Slice<Member>>;

    /// Content of one page only
    async fn find_list_by_age(
        &self,
        age: i32,
        request: &PageRequest<MemberField>,
    ) -> RepoResult<Vec<Member>>;

    /// Page of members with exactly this age, where the content query
    /// left-joins the team table and a separate count query reads the member
    /// table alone. A left join cannot change the row count, so the cheaper
    /// count gives the same total.
    async fn find_by_age_detach_count_query(
        &self,
        age: i32,
        request: &PageRequest<MemberField>,
    ) -> RepoResult<Page<Member>>;

    /// Add one to the age of every member aged `age` or older, in the store.
    ///
    /// Entities already loaded elsewhere keep their old age.
    async fn bulk_age_plus(&self, age: i32) -> RepoResult<u64>;

    /// Every member with its team, loaded in one left-join query
    async fn find_member_fetch_join(&self) -> RepoResult<Vec<MemberWithTeam>>;

    /// Every member with its team, loaded through the declared team graph
    async fn find_all_with_team(&self) -> RepoResult<Vec<MemberWithTeam>>;

    /// Members with this username, fetched as full rows, mapped to the open projection
    async fn find_projections_by_username(&self, username: &str) -> RepoResult<Vec<UsernameOnly>>;

    /// Closed projection selecting only the username column
    async fn find_projections_dto_by_username(
        &self,
        username: &str,
    ) -> RepoResult<Vec<UsernameOnlyDto>>;

    /// Raw SQL singular lookup
    async fn find_by_native_query(&self, username: &str) -> RepoResult<Option<Member>>;

    /// Paged raw SQL projection with an explicit count query
    async fn find_by_native_projection(
        &self,
        request: &PageRequest<MemberField>,
    ) -> RepoResult<Page<MemberProjection>>;
}

// ============================================================================
// Team Repository
// ============================================================================

#[async_trait]
pub trait TeamRepository: CrudRepository<Team, TeamId> {
    /// First team with this name
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Team>>;
}

// ============================================================================
// Item Repository
// ============================================================================

/// Items carry their own key. `save` inserts when the item is new (no
/// creation timestamp yet) and merges otherwise, without reading first.
pub trait ItemRepository: CrudRepository<Item, String> {}

impl<T> ItemRepository for T where T: CrudRepository<Item, String> {}
