//! PostgreSQL implementation of MemberRepository

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

use roster_core::auditing::AuditContext;
use roster_core::entities::{Member, MemberWithTeam, Persistable};
use roster_core::error::DomainError;
use roster_core::projections::{MemberDto, MemberProjection, UsernameOnly, UsernameOnlyDto};
use roster_core::query::{
    Example, MemberField, MemberProbe, Page, PageRequest, Slice, Sort, Specification,
    MEMBER_TEAM_JOIN,
};
use roster_core::traits::{
    CrudRepository, MemberRepository, PagingRepository, QueryByExampleExecutor, RepoResult,
    SpecificationExecutor,
};
use roster_core::value_objects::MemberId;

use crate::models::{MemberModel, MemberSummaryModel, MemberWithTeamModel};
use crate::sql::render::{push_joins, push_order_by, push_page, push_slice, push_where, JoinKind};
use crate::sql::{member as member_sql, MemberQueries, PgQueryBuilder, MEMBER_COLUMNS};

use super::error::{map_db_error, map_member_write_error, member_not_found, single_result};
use super::projection::ClosedProjection;

/// Ordering applied when the caller asks for none
const DEFAULT_ORDER: &str = "m.member_id";

/// PostgreSQL implementation of MemberRepository
#[derive(Clone)]
pub struct PgMemberRepository {
    pub(super) pool: PgPool,
    pub(super) queries: Arc<MemberQueries>,
}

impl PgMemberRepository {
    /// Create the repository, preparing every explicit query first.
    ///
    /// A query the server rejects fails here with `InvalidQuery`.
    pub async fn init(pool: PgPool) -> RepoResult<Self> {
        let queries = MemberQueries::init(&pool).await?;
        Ok(Self {
            pool,
            queries: Arc::new(queries),
        })
    }

    /// Run a member query built from the typed query model
    async fn fetch_members(&self, mut qb: PgQueryBuilder) -> RepoResult<Vec<Member>> {
        debug!(sql = qb.sql(), "Fetching members");
        let models = qb
            .build_query_as::<MemberModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(models.into_iter().map(Member::from).collect())
    }

    async fn fetch_count(&self, mut qb: PgQueryBuilder) -> RepoResult<i64> {
        debug!(sql = qb.sql(), "Counting members");
        qb.build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    /// Members with their team, left-joined, filtered by `spec`
    async fn fetch_with_team(
        &self,
        spec: &Specification<MemberField>,
    ) -> RepoResult<Vec<MemberWithTeam>> {
        let mut qb = PgQueryBuilder::new(format!(
            "SELECT {MEMBER_COLUMNS}, t.name AS team_name FROM member m"
        ));
        push_joins(&mut qb, &[MEMBER_TEAM_JOIN], JoinKind::Left);
        push_where(&mut qb, spec);
        push_order_by(&mut qb, &Sort::<MemberField>::unsorted(), Some(DEFAULT_ORDER));

        let models = qb
            .build_query_as::<MemberWithTeamModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(models.into_iter().map(MemberWithTeam::from).collect())
    }

    /// Run an explicit query that binds a single argument
    async fn fetch_named<T>(&self, sql: &'static str, arg: T) -> RepoResult<Vec<Member>>
    where
        T: for<'q> sqlx::Encode<'q, sqlx::Postgres> + sqlx::Type<sqlx::Postgres> + Send + 'static,
    {
        let models = sqlx::query_as::<_, MemberModel>(sql)
            .bind(arg)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(models.into_iter().map(Member::from).collect())
    }

    /// Closed projection of members with this username.
    ///
    /// Only the columns declared by `P` are selected. Generic methods cannot
    /// be called through `dyn MemberRepository`, so this lives on the
    /// concrete type.
    #[instrument(skip(self))]
    pub async fn find_projection_by_username<P: ClosedProjection>(
        &self,
        username: &str,
    ) -> RepoResult<Vec<P>> {
        let mut qb = PgQueryBuilder::new(format!("SELECT {} FROM member m", P::COLUMNS));
        if let Some(join) = P::join() {
            push_joins(&mut qb, &[join], JoinKind::Left);
        }
        push_where(&mut qb, &Specification::eq(MemberField::Username, username));
        push_order_by(&mut qb, &Sort::<MemberField>::unsorted(), Some(DEFAULT_ORDER));
        debug!(sql = qb.sql(), "Fetching closed projection");

        let rows = qb.build().fetch_all(&self.pool).await.map_err(map_db_error)?;
        rows.iter()
            .map(P::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_db_error)
    }

    async fn paged(
        &self,
        spec: &Specification<MemberField>,
        request: &PageRequest<MemberField>,
    ) -> RepoResult<Page<Member>> {
        let mut qb = member_sql::select(spec, request.sort());
        push_order_by(&mut qb, request.sort(), Some(DEFAULT_ORDER));
        push_page(&mut qb, request);
        let content = self.fetch_members(qb).await?;

        let total = match Page::<Member>::known_total(content.len(), request) {
            Some(total) => total,
            None => self.fetch_count(member_sql::count(spec)).await?,
        };
        Ok(Page::new(content, request, total))
    }
}

// ============================================================================
// CRUD
// ============================================================================

#[async_trait]
impl CrudRepository<Member, MemberId> for PgMemberRepository {
    #[instrument(skip(self, audit), fields(actor = audit.actor()))]
    async fn save(&self, mut member: Member, audit: &AuditContext) -> RepoResult<Member> {
        let team_id = member.team_id;

        if member.is_new() {
            member.audit.on_create(audit);
            let model = member_sql::insert(&self.pool, &member)
                .await
                .map_err(|e| map_member_write_error(e, team_id))?;
            return Ok(Member::from(model));
        }

        let id = member.id.ok_or(DomainError::TransientEntity("Member"))?;
        member.audit.on_update(audit);
        let model = member_sql::update(&self.pool, id.into_inner(), &member)
            .await
            .map_err(|e| map_member_write_error(e, team_id))?
            .ok_or_else(|| member_not_found(id))?;

        Ok(Member::from(model))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: MemberId) -> RepoResult<Option<Member>> {
        let model = member_sql::find_by_id(&self.pool, id.into_inner())
            .await
            .map_err(map_db_error)?;

        Ok(model.map(Member::from))
    }

    #[instrument(skip(self))]
    async fn exists_by_id(&self, id: MemberId) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM member WHERE member_id = $1)
            ",
        )
        .bind(id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<Member>> {
        self.find_all_sorted(&Sort::unsorted()).await
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT count(*) FROM member")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, member), fields(member_id = ?member.id))]
    async fn delete(&self, member: &Member) -> RepoResult<()> {
        let id = member.id.ok_or(DomainError::TransientEntity("Member"))?;
        self.delete_by_id(id).await
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: MemberId) -> RepoResult<()> {
        let existed = member_sql::delete_by_id(&self.pool, id.into_inner())
            .await
            .map_err(map_db_error)?;

        if !existed {
            return Err(member_not_found(id));
        }

        Ok(())
    }
}

// ============================================================================
// Paging, Specifications, Examples
// ============================================================================

#[async_trait]
impl PagingRepository<Member, MemberField> for PgMemberRepository {
    #[instrument(skip(self))]
    async fn find_all_sorted(&self, sort: &Sort<MemberField>) -> RepoResult<Vec<Member>> {
        let spec = Specification::all();
        let mut qb = member_sql::select(&spec, sort);
        push_order_by(&mut qb, sort, Some(DEFAULT_ORDER));
        self.fetch_members(qb).await
    }

    #[instrument(skip(self))]
    async fn find_all_paged(&self, request: &PageRequest<MemberField>) -> RepoResult<Page<Member>> {
        self.paged(&Specification::all(), request).await
    }
}

#[async_trait]
impl SpecificationExecutor<Member, MemberField> for PgMemberRepository {
    #[instrument(skip(self))]
    async fn find_all_by_spec(&self, spec: &Specification<MemberField>) -> RepoResult<Vec<Member>> {
        let mut qb = member_sql::select(spec, &Sort::unsorted());
        push_order_by(&mut qb, &Sort::<MemberField>::unsorted(), Some(DEFAULT_ORDER));
        self.fetch_members(qb).await
    }

    #[instrument(skip(self))]
    async fn find_one_by_spec(
        &self,
        spec: &Specification<MemberField>,
    ) -> RepoResult<Option<Member>> {
        let members = self.find_all_by_spec(spec).await?;
        single_result("find_one_by_spec", members)
    }

    #[instrument(skip(self))]
    async fn count_by_spec(&self, spec: &Specification<MemberField>) -> RepoResult<i64> {
        self.fetch_count(member_sql::count(spec)).await
    }

    #[instrument(skip(self))]
    async fn find_all_by_spec_paged(
        &self,
        spec: &Specification<MemberField>,
        request: &PageRequest<MemberField>,
    ) -> RepoResult<Page<Member>> {
        self.paged(spec, request).await
    }
}

#[async_trait]
impl QueryByExampleExecutor<Member, MemberProbe> for PgMemberRepository {
    #[instrument(skip(self))]
    async fn find_all_by_example(&self, example: &Example<MemberProbe>) -> RepoResult<Vec<Member>> {
        self.find_all_by_spec(&example.to_specification()).await
    }

    #[instrument(skip(self))]
    async fn count_by_example(&self, example: &Example<MemberProbe>) -> RepoResult<i64> {
        self.count_by_spec(&example.to_specification()).await
    }

    #[instrument(skip(self))]
    async fn exists_by_example(&self, example: &Example<MemberProbe>) -> RepoResult<bool> {
        Ok(self.count_by_example(example).await? > 0)
    }
}

// ============================================================================
// Member Finders
// ============================================================================

#[async_trait]
impl MemberRepository for PgMemberRepository {
    #[instrument(skip(self))]
    async fn find_by_username_and_age_greater_than(
        &self,
        username: &str,
        age: i32,
    ) -> RepoResult<Vec<Member>> {
        let models = member_sql::find_by_username_and_age_greater_than(&self.pool, username, age)
            .await
            .map_err(map_db_error)?;

        Ok(models.into_iter().map(Member::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_top3(&self) -> RepoResult<Vec<Member>> {
        let spec = Specification::all();
        let mut qb = member_sql::select(&spec, &Sort::unsorted());
        push_order_by(&mut qb, &Sort::<MemberField>::unsorted(), Some(DEFAULT_ORDER));
        qb.push(" LIMIT 3");
        self.fetch_members(qb).await
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Vec<Member>> {
        self.fetch_named(self.queries.find_by_username.sql(), username.to_string())
            .await
    }

    #[instrument(skip(self))]
    async fn find_user(&self, username: &str, age: i32) -> RepoResult<Vec<Member>> {
        let models = sqlx::query_as::<_, MemberModel>(self.queries.find_user.sql())
            .bind(username)
            .bind(age)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(models.into_iter().map(Member::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_username_list(&self) -> RepoResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(self.queries.find_username_list.sql())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn find_member_dto(&self) -> RepoResult<Vec<MemberDto>> {
        let models = sqlx::query_as::<_, MemberSummaryModel>(self.queries.find_member_dto.sql())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(models.into_iter().map(MemberDto::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_names(&self, names: &[String]) -> RepoResult<Vec<Member>> {
        self.fetch_named(self.queries.find_by_names.sql(), names.to_vec())
            .await
    }

    #[instrument(skip(self))]
    async fn find_list_by_username(&self, username: &str) -> RepoResult<Vec<Member>> {
        self.find_all_by_spec(&Specification::eq(MemberField::Username, username))
            .await
    }

    #[instrument(skip(self))]
    async fn find_member_by_username(&self, username: &str) -> RepoResult<Option<Member>> {
        let members = self.find_list_by_username(username).await?;
        single_result("find_member_by_username", members)
    }

    #[instrument(skip(self))]
    async fn find_optional_by_username(&self, username: &str) -> RepoResult<Option<Member>> {
        let members = self.find_list_by_username(username).await?;
        single_result("find_optional_by_username", members)
    }

    #[instrument(skip(self))]
    async fn find_by_age(
        &self,
        age: i32,
        request: &PageRequest<MemberField>,
    ) -> RepoResult<Page<Member>> {
        let content = self.find_list_by_age(age, request).await?;
        let total = match Page::<Member>::known_total(content.len(), request) {
            Some(total) => total,
            None => member_sql::count_by_age(&self.pool, age)
                .await
                .map_err(map_db_error)?,
        };
        Ok(Page::new(content, request, total))
    }

    #[instrument(skip(self))]
    async fn find_slice_by_age(
        &self,
        age: i32,
        request: &PageRequest<MemberField>,
    ) -> RepoResult<Slice<Member>> {
        let spec = Specification::eq(MemberField::Age, age);
        let mut qb = member_sql::select(&spec, request.sort());
        push_order_by(&mut qb, request.sort(), Some(DEFAULT_ORDER));
        push_slice(&mut qb, request);
        let rows = self.fetch_members(qb).await?;

        Ok(Slice::from_overfetch(rows, request))
    }

    #[instrument(skip(self))]
    async fn find_list_by_age(
        &self,
        age: i32,
        request: &PageRequest<MemberField>,
    ) -> RepoResult<Vec<Member>> {
        let models = member_sql::find_page_by_age(&self.pool, age, request)
            .await
            .map_err(map_db_error)?;

        Ok(models.into_iter().map(Member::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_age_detach_count_query(
        &self,
        age: i32,
        request: &PageRequest<MemberField>,
    ) -> RepoResult<Page<Member>> {
        let spec = Specification::eq(MemberField::Age, age);
        let mut qb = PgQueryBuilder::new(format!(
            "SELECT {MEMBER_COLUMNS}, t.name AS team_name FROM member m"
        ));
        push_joins(&mut qb, &[MEMBER_TEAM_JOIN], JoinKind::Left);
        push_where(&mut qb, &spec);
        push_order_by(&mut qb, request.sort(), Some(DEFAULT_ORDER));
        push_page(&mut qb, request);
        debug!(sql = qb.sql(), "Fetching members with team");

        let content: Vec<Member> = qb
            .build_query_as::<MemberWithTeamModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(|model| Member::from(model.member))
            .collect();

        // the count never needs the join
        let total = member_sql::count_by_age(&self.pool, age)
            .await
            .map_err(map_db_error)?;

        Ok(Page::new(content, request, total))
    }

    #[instrument(skip(self))]
    async fn bulk_age_plus(&self, age: i32) -> RepoResult<u64> {
        let affected = member_sql::bulk_age_plus(&self.pool, self.queries.bulk_age_plus.sql(), age)
            .await
            .map_err(map_db_error)?;

        info!(affected, "Bulk age update executed in the database");
        Ok(affected)
    }

    #[instrument(skip(self))]
    async fn find_member_fetch_join(&self) -> RepoResult<Vec<MemberWithTeam>> {
        self.fetch_with_team(&Specification::all()).await
    }

    #[instrument(skip(self))]
    async fn find_all_with_team(&self) -> RepoResult<Vec<MemberWithTeam>> {
        self.fetch_with_team(&Specification::all()).await
    }

    #[instrument(skip(self))]
    async fn find_projections_by_username(&self, username: &str) -> RepoResult<Vec<UsernameOnly>> {
        // the open projection needs the whole row
        let members = self.find_list_by_username(username).await?;
        Ok(members.iter().map(UsernameOnly::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_projections_dto_by_username(
        &self,
        username: &str,
    ) -> RepoResult<Vec<UsernameOnlyDto>> {
        self.find_projection_by_username::<UsernameOnlyDto>(username)
            .await
    }

    #[instrument(skip(self))]
    async fn find_by_native_query(&self, username: &str) -> RepoResult<Option<Member>> {
        let members = self
            .fetch_named(self.queries.find_by_native_query.sql(), username.to_string())
            .await?;
        single_result("find_by_native_query", members)
    }

    #[instrument(skip(self))]
    async fn find_by_native_projection(
        &self,
        request: &PageRequest<MemberField>,
    ) -> RepoResult<Page<MemberProjection>> {
        let models = sqlx::query_as::<_, MemberSummaryModel>(self.queries.native_projection.sql())
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        let total = sqlx::query_scalar::<_, i64>(self.queries.native_projection_count.sql())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let content = models.into_iter().map(MemberProjection::from).collect();
        Ok(Page::new(content, request, total))
    }
}
