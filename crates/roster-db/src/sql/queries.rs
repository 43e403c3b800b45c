//! Explicit member queries
//!
//! Queries whose SQL is fixed are declared here as [`NamedQuery`] values.
//! [`MemberQueries::init`] checks their placeholders and asks the server to
//! prepare each one, so a typo in a table or column name stops repository
//! construction instead of surfacing on the first call.

use sqlx::{Executor, PgPool};
use tracing::{debug, instrument};

use roster_core::error::DomainError;
use roster_core::query::NamedQuery;
use roster_core::traits::RepoResult;

/// Column list for a full member row under alias `m`
pub const MEMBER_COLUMNS: &str = "m.member_id, m.username, m.age, m.team_id, \
     m.created_date, m.last_modified_date, m.created_by, m.last_modified_by";

/// The explicit queries used by the member repositories
#[derive(Debug, Clone)]
pub struct MemberQueries {
    pub find_by_username: NamedQuery,
    pub find_user: NamedQuery,
    pub find_username_list: NamedQuery,
    pub find_member_dto: NamedQuery,
    pub find_by_names: NamedQuery,
    pub find_by_native_query: NamedQuery,
    pub native_projection: NamedQuery,
    pub native_projection_count: NamedQuery,
    pub find_member_custom: NamedQuery,
    pub bulk_age_plus: NamedQuery,
}

impl MemberQueries {
    /// Declare every query, checking placeholders only
    pub fn declare() -> RepoResult<Self> {
        Ok(Self {
            find_by_username: NamedQuery::new(
                "member.find_by_username",
                "SELECT m.member_id, m.username, m.age, m.team_id, m.created_date, \
                 m.last_modified_date, m.created_by, m.last_modified_by \
                 FROM member m WHERE m.username = $1 ORDER BY m.member_id",
                1,
            )?,
            find_user: NamedQuery::new(
                "member.find_user",
                "SELECT m.member_id, m.username, m.age, m.team_id, m.created_date, \
                 m.last_modified_date, m.created_by, m.last_modified_by \
                 FROM member m WHERE m.username = $1 AND m.age = $2 ORDER BY m.member_id",
                2,
            )?,
            find_username_list: NamedQuery::new(
                "member.find_username_list",
                "SELECT m.username FROM member m ORDER BY m.member_id",
                0,
            )?,
            find_member_dto: NamedQuery::new(
                "member.find_member_dto",
                "SELECT m.member_id, m.username, t.name AS team_name \
                 FROM member m INNER JOIN team t ON t.team_id = m.team_id \
                 ORDER BY m.member_id",
                0,
            )?,
            find_by_names: NamedQuery::new(
                "member.find_by_names",
                "SELECT m.member_id, m.username, m.age, m.team_id, m.created_date, \
                 m.last_modified_date, m.created_by, m.last_modified_by \
                 FROM member m WHERE m.username = ANY($1) ORDER BY m.member_id",
                1,
            )?,
            find_by_native_query: NamedQuery::new(
                "member.find_by_native_query",
                "SELECT * FROM member WHERE username = $1",
                1,
            )?,
            native_projection: NamedQuery::new(
                "member.native_projection",
                "SELECT m.member_id, m.username, t.name AS team_name \
                 FROM member m LEFT JOIN team t ON t.team_id = m.team_id \
                 ORDER BY m.member_id LIMIT $1 OFFSET $2",
                2,
            )?,
            native_projection_count: NamedQuery::new(
                "member.native_projection_count",
                "SELECT count(*) FROM member",
                0,
            )?,
            find_member_custom: NamedQuery::new(
                "member.find_member_custom",
                "SELECT m.member_id, m.username, m.age, m.team_id, m.created_date, \
                 m.last_modified_date, m.created_by, m.last_modified_by \
                 FROM member m ORDER BY m.member_id",
                0,
            )?,
            bulk_age_plus: NamedQuery::new(
                "member.bulk_age_plus",
                "UPDATE member SET age = age + 1 WHERE age >= $1",
                1,
            )?,
        })
    }

    /// Declare every query and prepare it against the server
    #[instrument(skip(pool))]
    pub async fn init(pool: &PgPool) -> RepoResult<Self> {
        let queries = Self::declare()?;
        for query in queries.all() {
            prepare(pool, query).await?;
        }
        debug!(count = queries.all().len(), "Prepared member queries");
        Ok(queries)
    }

    pub fn all(&self) -> [&NamedQuery; 10] {
        [
            &self.find_by_username,
            &self.find_user,
            &self.find_username_list,
            &self.find_member_dto,
            &self.find_by_names,
            &self.find_by_native_query,
            &self.native_projection,
            &self.native_projection_count,
            &self.find_member_custom,
            &self.bulk_age_plus,
        ]
    }
}

/// Ask the server to parse and plan `query` without running it
pub async fn prepare(pool: &PgPool, query: &NamedQuery) -> RepoResult<()> {
    pool.prepare(query.sql())
        .await
        .map(|_| ())
        .map_err(|e| DomainError::InvalidQuery {
            name: query.name(),
            reason: e.to_string(),
        })
}
