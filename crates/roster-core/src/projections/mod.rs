//! Projections - partial views of members
//!
//! A closed projection declares exactly the columns it needs and the
//! query selects only those. An open projection computes its value from the
//! whole entity, so the full row has to be loaded first. A nested projection
//! narrows the root to its declared columns but loads the association in
//! full.

use serde::Serialize;

use crate::entities::{Member, MemberWithTeam, Team};
use crate::value_objects::MemberId;

/// Open projection: `"{username} {age}"` computed from a loaded member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsernameOnly {
    username: String,
}

impl UsernameOnly {
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl From<&Member> for UsernameOnly {
    fn from(member: &Member) -> Self {
        Self {
            username: format!("{} {}", member.username, member.age),
        }
    }
}

impl From<Member> for UsernameOnly {
    fn from(member: Member) -> Self {
        Self::from(&member)
    }
}

/// Closed projection selecting only the username column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsernameOnlyDto {
    pub username: String,
}

impl UsernameOnlyDto {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Id, username and team name, produced by an explicit SQL query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberProjection {
    pub id: MemberId,
    pub username: String,
    pub team_name: Option<String>,
}

/// Member username with the whole team row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedClosedProjection {
    pub username: String,
    pub team: Option<Team>,
}

impl NestedClosedProjection {
    pub fn team_name(&self) -> Option<&str> {
        self.team.as_ref().map(|team| team.name.as_str())
    }
}

/// Transfer object for member listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberDto {
    pub id: Option<MemberId>,
    pub username: String,
    pub team_name: Option<String>,
}

impl MemberDto {
    pub fn new(id: MemberId, username: impl Into<String>, team_name: Option<String>) -> Self {
        Self {
            id: Some(id),
            username: username.into(),
            team_name,
        }
    }
}

/// Converting a bare member leaves the team name empty; the team row was
/// not loaded.
impl From<&Member> for MemberDto {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            username: member.username.clone(),
            team_name: None,
        }
    }
}

impl From<Member> for MemberDto {
    fn from(member: Member) -> Self {
        Self::from(&member)
    }
}

impl From<&MemberWithTeam> for MemberDto {
    fn from(value: &MemberWithTeam) -> Self {
        Self {
            id: value.member.id,
            username: value.member.username.clone(),
            team_name: value.team_name().map(str::to_string),
        }
    }
}
