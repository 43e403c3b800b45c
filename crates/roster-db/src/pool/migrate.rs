//! Schema creation

use sqlx::postgres::PgPool;
use tracing::info;

const CREATE_ROSTER: &str = include_str!("../../migrations/0001_create_roster.sql");

/// Create the roster tables and indexes if they do not exist yet
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(CREATE_ROSTER).execute(pool).await?;
    info!("Database schema is up to date");
    Ok(())
}
