//! Member entity - a person who optionally belongs to one team

use crate::value_objects::{MemberId, TeamId};

use super::audit::{AuditFields, Persistable};
use super::team::Team;

/// Member entity.
///
/// The team is referenced by key only. Loading the team row is always an
/// explicit decision of the caller, either through a fetch-join finder that
/// returns [`MemberWithTeam`] or through a second query. Looping over
/// members and loading each team separately issues one query per member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: Option<MemberId>,
    pub username: String,
    pub age: i32,
    pub team_id: Option<TeamId>,
    pub audit: AuditFields,
}

impl Member {
    /// Create a transient member with no team
    pub fn new(username: impl Into<String>, age: i32) -> Self {
        Self {
            id: None,
            username: username.into(),
            age,
            team_id: None,
            audit: AuditFields::default(),
        }
    }

    /// Create a transient member with age zero
    pub fn named(username: impl Into<String>) -> Self {
        Self::new(username, 0)
    }

    /// Builder-style team assignment
    pub fn with_team(mut self, team: &Team) -> Self {
        self.team_id = team.id;
        self
    }

    /// Move the member to another team
    pub fn change_team(&mut self, team: &Team) {
        self.team_id = team.id;
    }

    /// Drop the team association
    pub fn leave_team(&mut self) {
        self.team_id = None;
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }
}

impl Persistable for Member {
    fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

/// A member together with its team, produced by fetch-join queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberWithTeam {
    pub member: Member,
    pub team: Option<Team>,
}

impl MemberWithTeam {
    /// Team name, if the member has a team
    pub fn team_name(&self) -> Option<&str> {
        self.team.as_ref().map(|team| team.name.as_str())
    }
}
