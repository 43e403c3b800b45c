//! Application state
//!
//! Holds the repositories, the pool (for readiness checks), the fallback
//! auditor and the configuration.

use std::sync::Arc;

use roster_common::AppConfig;
use roster_core::auditing::{AuditorAware, FixedAuditor};
use roster_core::traits::{MemberRepository, TeamRepository};
use roster_db::{PgMemberQueryRepository, PgMemberRepository, PgPool, PgTeamRepository};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pool: PgPool,
    members: Arc<dyn MemberRepository>,
    member_queries: Arc<PgMemberQueryRepository>,
    teams: Arc<dyn TeamRepository>,
    /// Actor used when a request names none
    auditor: Arc<dyn AuditorAware>,
    config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the Postgres repositories over `pool`.
    ///
    /// The member repository prepares its explicit queries first, so a
    /// broken query stops startup here.
    pub async fn new(pool: PgPool, config: AppConfig) -> roster_core::RepoResult<Self> {
        let members = PgMemberRepository::init(pool.clone()).await?;
        let auditor = FixedAuditor::new(config.audit.default_auditor.clone());

        Ok(Self {
            members: Arc::new(members),
            member_queries: Arc::new(PgMemberQueryRepository::new(pool.clone())),
            teams: Arc::new(PgTeamRepository::new(pool.clone())),
            auditor: Arc::new(auditor),
            config: Arc::new(config),
            pool,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn members(&self) -> &dyn MemberRepository {
        self.members.as_ref()
    }

    pub fn member_queries(&self) -> &PgMemberQueryRepository {
        &self.member_queries
    }

    pub fn teams(&self) -> &dyn TeamRepository {
        self.teams.as_ref()
    }

    pub fn auditor(&self) -> &dyn AuditorAware {
        self.auditor.as_ref()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("members", &"PgMemberRepository")
            .field("teams", &"PgTeamRepository")
            .field("config", &"AppConfig")
            .finish()
    }
}
