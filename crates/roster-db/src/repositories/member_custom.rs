//! Hand-written member query, merged into the member repository
//!
//! `MemberRepositoryCustom` is a separate trait implemented on the same
//! type, so callers holding a `dyn MemberRepository` reach it alongside the
//! standard operations.

use async_trait::async_trait;
use tracing::instrument;

use roster_core::entities::Member;
use roster_core::traits::{MemberRepositoryCustom, RepoResult};

use crate::models::MemberModel;

use super::error::map_db_error;
use super::member::PgMemberRepository;

#[async_trait]
impl MemberRepositoryCustom for PgMemberRepository {
    #[instrument(skip(self))]
    async fn find_member_custom(&self) -> RepoResult<Vec<Member>> {
        let models = sqlx::query_as::<_, MemberModel>(self.queries.find_member_custom.sql())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(models.into_iter().map(Member::from).collect())
    }
}
