//! Team statements shared by the pooled repository and the session

use sqlx::PgExecutor;

use roster_core::query::{PageRequest, Sort, TeamField};

use crate::models::TeamModel;

use super::render::{push_order_by, push_page, PgQueryBuilder};

/// Ordering applied when the caller asks for none
pub const DEFAULT_ORDER: &str = "t.team_id";

/// `SELECT t.team_id, t.name FROM team t ORDER BY ...`
pub fn select_sorted(sort: &Sort<TeamField>) -> PgQueryBuilder {
    let mut qb = PgQueryBuilder::new("SELECT t.team_id, t.name FROM team t");
    push_order_by(&mut qb, sort, Some(DEFAULT_ORDER));
    qb
}

/// One page of teams in the requested order
pub fn select_page(request: &PageRequest<TeamField>) -> PgQueryBuilder {
    let mut qb = select_sorted(request.sort());
    push_page(&mut qb, request);
    qb
}

pub async fn insert<'e, E>(executor: E, name: &str) -> Result<TeamModel, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, TeamModel>("INSERT INTO team (name) VALUES ($1) RETURNING team_id, name")
        .bind(name)
        .fetch_one(executor)
        .await
}

/// Rename a team; `None` when the row no longer exists
pub async fn update<'e, E>(
    executor: E,
    id: i64,
    name: &str,
) -> Result<Option<TeamModel>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, TeamModel>(
        "UPDATE team SET name = $2 WHERE team_id = $1 RETURNING team_id, name",
    )
    .bind(id)
    .bind(name)
    .fetch_optional(executor)
    .await
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<TeamModel>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, TeamModel>("SELECT team_id, name FROM team WHERE team_id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}
