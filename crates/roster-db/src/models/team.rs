//! Team database model

use sqlx::FromRow;

/// Database model for the team table
#[derive(Debug, Clone, FromRow)]
pub struct TeamModel {
    pub team_id: i64,
    pub name: String,
}
