//! Unit of work over one PostgreSQL transaction
//!
//! A [`PgSession`] keeps every member and team it loads or persists in an
//! identity map. Lookups by key hit the map before the database, changes
//! made through [`PgSession::member_mut`] are written on [`PgSession::flush`],
//! and [`PgSession::commit`] flushes before committing.
//!
//! Statements that bypass the map, such as [`PgSession::bulk_age_plus`],
//! change rows the map already holds without touching the managed copies.
//! Call [`PgSession::clear`] afterwards, or use
//! [`PgSession::bulk_age_plus_and_clear`].

use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info, instrument, warn};

use roster_core::auditing::AuditContext;
use roster_core::entities::{Member, Team};
use roster_core::error::DomainError;
use roster_core::query::{LockMode, MemberField, Sort, Specification};
use roster_core::traits::RepoResult;
use roster_core::unit_of_work::IdentityMap;
use roster_core::value_objects::{MemberId, TeamId};

use crate::models::MemberModel;
use crate::repositories::error::{
    map_db_error, map_member_write_error, member_not_found, team_not_found,
};
use crate::sql::render::{push_order_by, PgQueryBuilder};
use crate::sql::{member as member_sql, team as team_sql, MemberQueries};

/// One transaction plus the entities it manages
pub struct PgSession {
    tx: Transaction<'static, Postgres>,
    audit: AuditContext,
    queries: MemberQueries,
    members: IdentityMap<MemberId, Member>,
    teams: IdentityMap<TeamId, Team>,
}

impl PgSession {
    /// Open a transaction. Every write in the session is stamped with `audit`.
    pub async fn begin(pool: &PgPool, audit: AuditContext) -> RepoResult<Self> {
        let queries = MemberQueries::declare()?;
        let tx = pool.begin().await.map_err(map_db_error)?;
        debug!(actor = audit.actor(), "Session started");

        Ok(Self {
            tx,
            audit,
            queries,
            members: IdentityMap::new(),
            teams: IdentityMap::new(),
        })
    }

    pub fn audit(&self) -> &AuditContext {
        &self.audit
    }

    /// Number of managed members
    pub fn managed_members(&self) -> usize {
        self.members.len()
    }

    /// Whether the member is currently held by the identity map
    pub fn is_managed(&self, id: MemberId) -> bool {
        self.members.contains(&id)
    }

    /// Whether the member was loaded read-only; flush never writes it
    pub fn is_read_only(&self, id: MemberId) -> bool {
        self.members.is_read_only(&id)
    }

    // ========================================================================
    // Persist / Remove
    // ========================================================================

    /// Insert a new member right away and manage it
    #[instrument(skip(self, member), fields(username = %member.username))]
    pub async fn persist_member(&mut self, mut member: Member) -> RepoResult<MemberId> {
        if member.id.is_some() {
            return Err(DomainError::ValidationError(
                "persist expects a new member; load it to change it".to_string(),
            ));
        }

        let team_id = member.team_id;
        member.audit.on_create(&self.audit);
        let model = member_sql::insert(&mut *self.tx, &member)
            .await
            .map_err(|e| map_member_write_error(e, team_id))?;

        let id = MemberId::new(model.member_id);
        self.members.register(id, Member::from(model));
        Ok(id)
    }

    /// Insert a new team right away and manage it
    #[instrument(skip(self, team), fields(name = %team.name))]
    pub async fn persist_team(&mut self, team: Team) -> RepoResult<TeamId> {
        if team.id.is_some() {
            return Err(DomainError::ValidationError(
                "persist expects a new team; load it to change it".to_string(),
            ));
        }

        let model = team_sql::insert(&mut *self.tx, &team.name)
            .await
            .map_err(map_db_error)?;

        let id = TeamId::new(model.team_id);
        self.teams.register(id, Team::from(model));
        Ok(id)
    }

    /// Delete a member and stop managing it
    #[instrument(skip(self))]
    pub async fn remove_member(&mut self, id: MemberId) -> RepoResult<()> {
        let existed = member_sql::delete_by_id(&mut *self.tx, id.into_inner())
            .await
            .map_err(map_db_error)?;
        self.members.detach(&id);

        if !existed {
            return Err(member_not_found(id));
        }

        Ok(())
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// The managed member for `id`, loading it on first access.
    ///
    /// Repeated calls return the same instance without another query.
    #[instrument(skip(self))]
    pub async fn find_member(&mut self, id: MemberId) -> RepoResult<Option<&Member>> {
        if !self.load_member(id).await? {
            return Ok(None);
        }
        Ok(self.members.get(&id))
    }

    /// Mutable access to a managed member; changes are written on flush
    #[instrument(skip(self))]
    pub async fn member_mut(&mut self, id: MemberId) -> RepoResult<Option<&mut Member>> {
        if !self.load_member(id).await? {
            return Ok(None);
        }
        Ok(self.members.get_mut(&id))
    }

    #[instrument(skip(self))]
    pub async fn find_team(&mut self, id: TeamId) -> RepoResult<Option<&Team>> {
        if !self.load_team(id).await? {
            return Ok(None);
        }
        Ok(self.teams.get(&id))
    }

    /// Mutable access to a managed team; a rename is written on flush
    #[instrument(skip(self))]
    pub async fn team_mut(&mut self, id: TeamId) -> RepoResult<Option<&mut Team>> {
        if !self.load_team(id).await? {
            return Ok(None);
        }
        Ok(self.teams.get_mut(&id))
    }

    /// Members with this username, managed without a snapshot.
    ///
    /// Changes made to them are never flushed. A member that was already
    /// managed keeps its existing state.
    #[instrument(skip(self))]
    pub async fn find_read_only_member_by_username(
        &mut self,
        username: &str,
    ) -> RepoResult<Vec<Member>> {
        let models = member_sql::find_by_username_locked(&mut *self.tx, username, LockMode::None)
            .await
            .map_err(map_db_error)?;

        Ok(models
            .into_iter()
            .map(|model| {
                let id = MemberId::new(model.member_id);
                self.members.register_read_only(id, Member::from(model)).clone()
            })
            .collect())
    }

    /// Members with this username, taking a row lock until the session ends
    #[instrument(skip(self))]
    pub async fn find_lock_member_by_username(
        &mut self,
        username: &str,
        lock: LockMode,
    ) -> RepoResult<Vec<Member>> {
        let models = member_sql::find_by_username_locked(&mut *self.tx, username, lock)
            .await
            .map_err(map_db_error)?;

        Ok(self.manage_all(models))
    }

    /// Members of exactly this age, by username descending, windowed by
    /// `offset` and `limit`
    #[instrument(skip(self))]
    pub async fn find_members_by_page(
        &mut self,
        age: i32,
        offset: i64,
        limit: i64,
    ) -> RepoResult<Vec<Member>> {
        let spec = Specification::eq(MemberField::Age, age);
        let mut qb = member_sql::select(&spec, &Sort::unsorted());
        push_order_by(&mut qb, &Sort::desc(MemberField::Username), None);
        qb.push(" LIMIT ").push_bind(limit.max(0));
        qb.push(" OFFSET ").push_bind(offset.max(0));

        let models = self.fetch_members(qb).await?;
        Ok(self.manage_all(models))
    }

    /// Number of members of exactly this age
    #[instrument(skip(self))]
    pub async fn total_count(&mut self, age: i32) -> RepoResult<i64> {
        member_sql::count_by_age(&mut *self.tx, age)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    pub async fn find_by_username_and_age_greater_than(
        &mut self,
        username: &str,
        age: i32,
    ) -> RepoResult<Vec<Member>> {
        let models =
            member_sql::find_by_username_and_age_greater_than(&mut *self.tx, username, age)
                .await
                .map_err(map_db_error)?;

        Ok(self.manage_all(models))
    }

    // ========================================================================
    // Synchronisation
    // ========================================================================

    /// Write every dirty managed entity; returns the number of updates
    #[instrument(skip(self))]
    pub async fn flush(&mut self) -> RepoResult<usize> {
        let mut written = 0;

        for id in self.teams.dirty_keys() {
            let Some(name) = self.teams.get(&id).map(|team| team.name.clone()) else {
                continue;
            };
            let model = team_sql::update(&mut *self.tx, id.into_inner(), &name)
                .await
                .map_err(map_db_error)?
                .ok_or_else(|| team_not_found(id))?;
            self.teams.mark_clean(&id, Team::from(model));
            written += 1;
        }

        for id in self.members.dirty_keys() {
            let Some(mut member) = self.members.get(&id).cloned() else {
                continue;
            };
            let team_id = member.team_id;
            member.audit.on_update(&self.audit);
            let model = member_sql::update(&mut *self.tx, id.into_inner(), &member)
                .await
                .map_err(|e| map_member_write_error(e, team_id))?
                .ok_or_else(|| member_not_found(id))?;
            self.members.mark_clean(&id, Member::from(model));
            written += 1;
        }

        if written > 0 {
            debug!(written, "Flushed dirty entities");
        }
        Ok(written)
    }

    /// Stop managing everything; unflushed changes are discarded
    pub fn clear(&mut self) {
        self.members.clear();
        self.teams.clear();
    }

    // ========================================================================
    // Bulk Updates
    // ========================================================================

    /// `age = age + 1` for every member aged `age` or older, executed in the
    /// database only.
    ///
    /// Managed members keep the age they had before; finding them again
    /// returns the stale instance until the session is cleared.
    #[instrument(skip(self))]
    pub async fn bulk_age_plus(&mut self, age: i32) -> RepoResult<u64> {
        if !self.members.is_empty() {
            warn!(
                managed = self.members.len(),
                "Bulk update bypasses the identity map; managed members are now stale"
            );
        }

        let affected =
            member_sql::bulk_age_plus(&mut *self.tx, self.queries.bulk_age_plus.sql(), age)
                .await
                .map_err(map_db_error)?;

        info!(affected, "Bulk age update executed in the database");
        Ok(affected)
    }

    /// Flush, run the bulk update, then clear the identity map
    #[instrument(skip(self))]
    pub async fn bulk_age_plus_and_clear(&mut self, age: i32) -> RepoResult<u64> {
        self.flush().await?;
        let affected = self.bulk_age_plus(age).await?;
        self.clear();
        Ok(affected)
    }

    // ========================================================================
    // Completion
    // ========================================================================

    /// Flush pending changes and commit
    #[instrument(skip(self))]
    pub async fn commit(mut self) -> RepoResult<()> {
        self.flush().await?;
        self.tx.commit().await.map_err(map_db_error)?;
        debug!("Session committed");
        Ok(())
    }

    /// Discard everything done in the session
    #[instrument(skip(self))]
    pub async fn rollback(self) -> RepoResult<()> {
        self.tx.rollback().await.map_err(map_db_error)?;
        debug!("Session rolled back");
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Make sure `id` is managed; `false` when no such row exists
    async fn load_member(&mut self, id: MemberId) -> RepoResult<bool> {
        if self.members.contains(&id) {
            return Ok(true);
        }

        let model = member_sql::find_by_id(&mut *self.tx, id.into_inner())
            .await
            .map_err(map_db_error)?;

        match model {
            Some(model) => {
                self.members.register(id, Member::from(model));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn load_team(&mut self, id: TeamId) -> RepoResult<bool> {
        if self.teams.contains(&id) {
            return Ok(true);
        }

        let model = team_sql::find_by_id(&mut *self.tx, id.into_inner())
            .await
            .map_err(map_db_error)?;

        match model {
            Some(model) => {
                self.teams.register(id, Team::from(model));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn fetch_members(&mut self, mut qb: PgQueryBuilder) -> RepoResult<Vec<MemberModel>> {
        debug!(sql = qb.sql(), "Fetching members in session");
        qb.build_query_as::<MemberModel>()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    /// Register loaded rows, returning the managed state of each.
    ///
    /// Rows for members already managed are dropped in favour of the
    /// managed instance.
    fn manage_all(&mut self, models: Vec<MemberModel>) -> Vec<Member> {
        models
            .into_iter()
            .map(|model| {
                let id = MemberId::new(model.member_id);
                self.members.register(id, Member::from(model)).clone()
            })
            .collect()
    }
}
