//! Member entity <-> model mappers

use roster_core::entities::{AuditFields, Member, MemberWithTeam, Team};
use roster_core::projections::{MemberDto, MemberProjection};
use roster_core::value_objects::{MemberId, TeamId};

use crate::models::{MemberModel, MemberSummaryModel, MemberWithTeamModel};

impl From<MemberModel> for Member {
    fn from(model: MemberModel) -> Self {
        Member {
            id: Some(MemberId::new(model.member_id)),
            username: model.username,
            age: model.age,
            team_id: model.team_id.map(TeamId::new),
            audit: AuditFields {
                created_date: model.created_date,
                last_modified_date: model.last_modified_date,
                created_by: model.created_by,
                last_modified_by: model.last_modified_by,
            },
        }
    }
}

impl From<MemberWithTeamModel> for MemberWithTeam {
    fn from(model: MemberWithTeamModel) -> Self {
        let team = match (model.member.team_id, model.team_name) {
            (Some(team_id), Some(name)) => Some(Team {
                id: Some(TeamId::new(team_id)),
                name,
            }),
            _ => None,
        };
        MemberWithTeam {
            member: Member::from(model.member),
            team,
        }
    }
}

impl From<MemberSummaryModel> for MemberProjection {
    fn from(model: MemberSummaryModel) -> Self {
        MemberProjection {
            id: MemberId::new(model.member_id),
            username: model.username,
            team_name: model.team_name,
        }
    }
}

impl From<MemberSummaryModel> for MemberDto {
    fn from(model: MemberSummaryModel) -> Self {
        MemberDto::new(MemberId::new(model.member_id), model.username, model.team_name)
    }
}

/// Column values written for a member row
pub struct MemberWrite<'a> {
    pub username: &'a str,
    pub age: i32,
    pub team_id: Option<i64>,
    pub audit: &'a AuditFields,
}

impl<'a> MemberWrite<'a> {
    pub fn new(member: &'a Member) -> Self {
        Self {
            username: &member.username,
            age: member.age,
            team_id: member.team_id.map(TeamId::into_inner),
            audit: &member.audit,
        }
    }
}
