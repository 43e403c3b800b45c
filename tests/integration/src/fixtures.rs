//! Test fixtures and data generators
//!
//! Reusable teams, members and request bodies.

use anyhow::Result;
use chrono::{TimeZone, Utc};
use roster_core::auditing::AuditContext;
use roster_core::entities::{Member, Team};
use roster_core::traits::CrudRepository;
use roster_db::{PgMemberRepository, PgTeamRepository};
use serde::{Deserialize, Serialize};

/// Audit context with a fixed instant, for comparing stamped columns
pub fn audit_at(actor: &str, day: u32) -> AuditContext {
    let instant = Utc
        .with_ymd_and_hms(2024, 1, day, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    AuditContext::at(actor, instant)
}

/// The default actor for fixture writes
pub fn system_audit() -> AuditContext {
    AuditContext::new("fixture")
}

/// Two teams with two members each
pub struct TeamFixture {
    pub team_a: Team,
    pub team_b: Team,
    pub members: Vec<Member>,
}

/// teamA holds member1 (10) and member2 (20); teamB holds member3 (30) and
/// member4 (40)
pub async fn setup_team_members(
    teams: &PgTeamRepository,
    members: &PgMemberRepository,
) -> Result<TeamFixture> {
    let audit = system_audit();
    let team_a = teams.save(Team::new("teamA"), &audit).await?;
    let team_b = teams.save(Team::new("teamB"), &audit).await?;

    let people = vec![
        Member::new("member1", 10).with_team(&team_a),
        Member::new("member2", 20).with_team(&team_a),
        Member::new("member3", 30).with_team(&team_b),
        Member::new("member4", 40).with_team(&team_b),
    ];
    let members = members.save_all(people, &audit).await?;

    Ok(TeamFixture {
        team_a,
        team_b,
        members,
    })
}

/// Save plain members `(username, age)` without a team
pub async fn save_members(
    members: &PgMemberRepository,
    rows: &[(&str, i32)],
) -> Result<Vec<Member>> {
    let people = rows
        .iter()
        .map(|(username, age)| Member::new(*username, *age))
        .collect();
    Ok(members.save_all(people, &system_audit()).await?)
}

/// Body of `POST /members`
#[derive(Debug, Serialize)]
pub struct CreateMemberBody {
    pub username: String,
    pub age: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
}

impl CreateMemberBody {
    pub fn new(username: &str, age: i32) -> Self {
        Self {
            username: username.to_string(),
            age,
            team_id: None,
        }
    }
}

/// Member as returned by the API
#[derive(Debug, Deserialize)]
pub struct MemberBody {
    pub id: i64,
    pub username: String,
    pub team_name: Option<String>,
}

/// Page as returned by the API
#[derive(Debug, Deserialize)]
pub struct PageBody<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: i64,
    pub first: bool,
    pub last: bool,
    pub has_next: bool,
    pub previous: Option<u32>,
    pub next: Option<u32>,
}
