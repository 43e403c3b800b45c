//! Member database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the member table
#[derive(Debug, Clone, FromRow)]
pub struct MemberModel {
    pub member_id: i64,
    pub username: String,
    pub age: i32,
    pub team_id: Option<i64>,
    pub created_date: Option<DateTime<Utc>>,
    pub last_modified_date: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub last_modified_by: Option<String>,
}

/// Member row left-joined with its team
#[derive(Debug, Clone, FromRow)]
pub struct MemberWithTeamModel {
    #[sqlx(flatten)]
    pub member: MemberModel,
    pub team_name: Option<String>,
}

/// Id, username and team name, as returned by projection and DTO queries
#[derive(Debug, Clone, FromRow)]
pub struct MemberSummaryModel {
    pub member_id: i64,
    pub username: String,
    pub team_name: Option<String>,
}
