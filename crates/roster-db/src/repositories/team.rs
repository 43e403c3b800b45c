//! PostgreSQL implementation of TeamRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use roster_core::auditing::AuditContext;
use roster_core::entities::{Persistable, Team};
use roster_core::error::DomainError;
use roster_core::query::{Page, PageRequest, Sort, TeamField};
use roster_core::traits::{CrudRepository, PagingRepository, RepoResult, TeamRepository};
use roster_core::value_objects::TeamId;

use crate::models::TeamModel;
use crate::sql::team as team_sql;
use crate::sql::PgQueryBuilder;

use super::error::{map_db_error, team_not_found};

/// PostgreSQL implementation of TeamRepository
#[derive(Clone)]
pub struct PgTeamRepository {
    pool: PgPool,
}

impl PgTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_teams(&self, mut qb: PgQueryBuilder) -> RepoResult<Vec<Team>> {
        debug!(sql = qb.sql(), "Fetching teams");
        let models = qb
            .build_query_as::<TeamModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(models.into_iter().map(Team::from).collect())
    }
}

#[async_trait]
impl CrudRepository<Team, TeamId> for PgTeamRepository {
    /// Teams carry no audit columns; the context is unused
    #[instrument(skip(self, _audit))]
    async fn save(&self, team: Team, _audit: &AuditContext) -> RepoResult<Team> {
        if team.is_new() {
            let model = team_sql::insert(&self.pool, &team.name)
                .await
                .map_err(map_db_error)?;
            return Ok(Team::from(model));
        }

        let id = team.id.ok_or(DomainError::TransientEntity("Team"))?;
        let model = team_sql::update(&self.pool, id.into_inner(), &team.name)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| team_not_found(id))?;

        Ok(Team::from(model))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: TeamId) -> RepoResult<Option<Team>> {
        let model = team_sql::find_by_id(&self.pool, id.into_inner())
            .await
            .map_err(map_db_error)?;

        Ok(model.map(Team::from))
    }

    #[instrument(skip(self))]
    async fn exists_by_id(&self, id: TeamId) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM team WHERE team_id = $1)")
            .bind(id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<Team>> {
        let models =
            sqlx::query_as::<_, TeamModel>("SELECT team_id, name FROM team ORDER BY team_id")
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(models.into_iter().map(Team::from).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT count(*) FROM team")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, team), fields(team_id = ?team.id))]
    async fn delete(&self, team: &Team) -> RepoResult<()> {
        let id = team.id.ok_or(DomainError::TransientEntity("Team"))?;
        self.delete_by_id(id).await
    }

    /// Members of the deleted team are left without a team
    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: TeamId) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM team WHERE team_id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(team_not_found(id));
        }

        Ok(())
    }
}

#[async_trait]
impl PagingRepository<Team, TeamField> for PgTeamRepository {
    #[instrument(skip(self))]
    async fn find_all_sorted(&self, sort: &Sort<TeamField>) -> RepoResult<Vec<Team>> {
        self.fetch_teams(team_sql::select_sorted(sort)).await
    }

    #[instrument(skip(self))]
    async fn find_all_paged(&self, request: &PageRequest<TeamField>) -> RepoResult<Page<Team>> {
        let content = self.fetch_teams(team_sql::select_page(request)).await?;
        let total = match Page::<Team>::known_total(content.len(), request) {
            Some(total) => total,
            None => self.count().await?,
        };
        Ok(Page::new(content, request, total))
    }
}

#[async_trait]
impl TeamRepository for PgTeamRepository {
    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Team>> {
        let model = sqlx::query_as::<_, TeamModel>(
            "SELECT team_id, name FROM team WHERE name = $1 ORDER BY team_id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(model.map(Team::from))
    }
}
