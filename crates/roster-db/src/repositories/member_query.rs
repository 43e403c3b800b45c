//! Query-only member repository
//!
//! Screen-specific reads that do not belong on the aggregate repository.
//! It is a plain concrete type with no trait behind it.

use sqlx::PgPool;
use tracing::{debug, instrument};

use roster_core::entities::Member;
use roster_core::projections::MemberDto;
use roster_core::query::{MemberField, Page, PageRequest, MEMBER_TEAM_JOIN};
use roster_core::traits::RepoResult;

use crate::models::{MemberModel, MemberSummaryModel};
use crate::sql::render::{push_joins, push_order_by, push_page, JoinKind};
use crate::sql::{PgQueryBuilder, MEMBER_COLUMNS};

use super::error::map_db_error;

/// Reads members for listing screens
#[derive(Clone)]
pub struct PgMemberQueryRepository {
    pool: PgPool,
}

impl PgMemberQueryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every member, ordered by key
    #[instrument(skip(self))]
    pub async fn find_all_members(&self) -> RepoResult<Vec<Member>> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM member m ORDER BY m.member_id");
        let models = sqlx::query_as::<_, MemberModel>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(models.into_iter().map(Member::from).collect())
    }

    /// Page of member summaries with the team name, members without a team
    /// included.
    ///
    /// Sorting by a team property is allowed; the join is a left join either
    /// way.
    #[instrument(skip(self))]
    pub async fn find_member_summaries(
        &self,
        request: &PageRequest<MemberField>,
    ) -> RepoResult<Page<MemberDto>> {
        let mut qb = PgQueryBuilder::new("SELECT m.member_id, m.username, t.name AS team_name FROM member m");
        push_joins(&mut qb, &[MEMBER_TEAM_JOIN], JoinKind::Left);
        push_order_by(&mut qb, request.sort(), Some("m.member_id"));
        push_page(&mut qb, request);
        debug!(sql = qb.sql(), "Fetching member summaries");

        let content: Vec<MemberDto> = qb
            .build_query_as::<MemberSummaryModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(MemberDto::from)
            .collect();

        let total = match Page::<MemberDto>::known_total(content.len(), request) {
            Some(total) => total,
            None => sqlx::query_scalar::<_, i64>("SELECT count(*) FROM member")
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_error)?,
        };

        Ok(Page::new(content, request, total))
    }
}
