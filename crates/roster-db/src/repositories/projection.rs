//! Closed projections over the member table
//!
//! A closed projection names the columns it needs and builds itself from
//! a row holding only those columns. The query selects exactly that list.

use sqlx::postgres::PgRow;
use sqlx::Row;

use roster_core::entities::Team;
use roster_core::projections::{NestedClosedProjection, UsernameOnlyDto};
use roster_core::query::{Join, MEMBER_TEAM_JOIN};
use roster_core::value_objects::TeamId;

/// A result shape that can be selected directly from `member m`
pub trait ClosedProjection: Sized + Send + Unpin + 'static {
    /// Select list, qualified with the member (`m`) and team (`t`) aliases
    const COLUMNS: &'static str;

    /// Association joined (left) to reach the selected columns
    fn join() -> Option<Join> {
        None
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;
}

impl ClosedProjection for UsernameOnlyDto {
    const COLUMNS: &'static str = "m.username";

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self::new(row.try_get::<String, _>("username")?))
    }
}

/// The root is narrowed to the username; the team row is loaded whole.
impl ClosedProjection for NestedClosedProjection {
    const COLUMNS: &'static str = "m.username, t.team_id, t.name AS team_name";

    fn join() -> Option<Join> {
        Some(MEMBER_TEAM_JOIN)
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let team_id: Option<i64> = row.try_get("team_id")?;
        let team_name: Option<String> = row.try_get("team_name")?;
        let team = match (team_id, team_name) {
            (Some(id), Some(name)) => Some(Team {
                id: Some(TeamId::new(id)),
                name,
            }),
            _ => None,
        };
        Ok(Self {
            username: row.try_get("username")?,
            team,
        })
    }
}
