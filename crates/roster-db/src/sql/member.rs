//! Member statements shared by the pooled repository and the session
//!
//! Each function takes any PostgreSQL executor, so the same SQL runs on a
//! pool or inside a session's transaction.

use sqlx::PgExecutor;

use roster_core::entities::Member;
use roster_core::query::{LockMode, MemberField, PageRequest, Sort, Specification};

use crate::mappers::MemberWrite;
use crate::models::MemberModel;

use super::queries::MEMBER_COLUMNS;
use super::render::{
    push_lock, push_order_by, push_page, push_query_joins, push_where, PgQueryBuilder,
};

/// Insert a member and return the stored row with its generated key
pub async fn insert<'e, E>(executor: E, member: &Member) -> Result<MemberModel, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let write = MemberWrite::new(member);
    sqlx::query_as::<_, MemberModel>(
        r"
        INSERT INTO member (username, age, team_id, created_date, last_modified_date, created_by, last_modified_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING member_id, username, age, team_id, created_date, last_modified_date, created_by, last_modified_by
        ",
    )
    .bind(write.username)
    .bind(write.age)
    .bind(write.team_id)
    .bind(write.audit.created_date)
    .bind(write.audit.last_modified_date)
    .bind(write.audit.created_by.as_deref())
    .bind(write.audit.last_modified_by.as_deref())
    .fetch_one(executor)
    .await
}

/// Update the mutable columns of a persisted member.
///
/// Creation audit columns are never written. Returns `None` when the row
/// no longer exists.
pub async fn update<'e, E>(
    executor: E,
    id: i64,
    member: &Member,
) -> Result<Option<MemberModel>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let write = MemberWrite::new(member);
    sqlx::query_as::<_, MemberModel>(
        r"
        UPDATE member
        SET username = $2, age = $3, team_id = $4, last_modified_date = $5, last_modified_by = $6
        WHERE member_id = $1
        RETURNING member_id, username, age, team_id, created_date, last_modified_date, created_by, last_modified_by
        ",
    )
    .bind(id)
    .bind(write.username)
    .bind(write.age)
    .bind(write.team_id)
    .bind(write.audit.last_modified_date)
    .bind(write.audit.last_modified_by.as_deref())
    .fetch_optional(executor)
    .await
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<MemberModel>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, MemberModel>(
        r"
        SELECT member_id, username, age, team_id, created_date, last_modified_date, created_by, last_modified_by
        FROM member
        WHERE member_id = $1
        ",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Delete one row; returns whether it existed
pub async fn delete_by_id<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM member WHERE member_id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// `age = age + 1` for every member aged `age` or older
pub async fn bulk_age_plus<'e, E>(executor: E, sql: &str, age: i32) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(sql).bind(age).execute(executor).await?;
    Ok(result.rows_affected())
}

/// Members with this username and a strictly greater age
pub async fn find_by_username_and_age_greater_than<'e, E>(
    executor: E,
    username: &str,
    age: i32,
) -> Result<Vec<MemberModel>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, MemberModel>(
        r"
        SELECT member_id, username, age, team_id, created_date, last_modified_date, created_by, last_modified_by
        FROM member
        WHERE username = $1 AND age > $2
        ORDER BY member_id
        ",
    )
    .bind(username)
    .bind(age)
    .fetch_all(executor)
    .await
}

/// Every member with this username, taking the requested row lock
pub async fn find_by_username_locked<'e, E>(
    executor: E,
    username: &str,
    lock: LockMode,
) -> Result<Vec<MemberModel>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let spec = Specification::eq(MemberField::Username, username);
    let mut qb = select(&spec, &Sort::unsorted());
    push_order_by(&mut qb, &Sort::<MemberField>::unsorted(), Some("m.member_id"));
    push_lock(&mut qb, lock);
    qb.build_query_as::<MemberModel>().fetch_all(executor).await
}

/// Page of members with exactly this age
pub async fn find_page_by_age<'e, E>(
    executor: E,
    age: i32,
    request: &PageRequest<MemberField>,
) -> Result<Vec<MemberModel>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let spec = Specification::eq(MemberField::Age, age);
    let mut qb = select(&spec, request.sort());
    push_order_by(&mut qb, request.sort(), Some("m.member_id"));
    push_page(&mut qb, request);
    qb.build_query_as::<MemberModel>().fetch_all(executor).await
}

pub async fn count_by_age<'e, E>(executor: E, age: i32) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>("SELECT count(*) FROM member WHERE age = $1")
        .bind(age)
        .fetch_one(executor)
        .await
}

/// `SELECT <member columns> FROM member m <joins> <where>`, ready for
/// ordering and paging
pub fn select(
    spec: &Specification<MemberField>,
    sort: &Sort<MemberField>,
) -> PgQueryBuilder {
    let mut qb = PgQueryBuilder::new(format!("SELECT {MEMBER_COLUMNS} FROM member m"));
    push_query_joins(&mut qb, spec, sort);
    push_where(&mut qb, spec);
    qb
}

/// `SELECT count(*) FROM member m <joins> <where>`
pub fn count(spec: &Specification<MemberField>) -> PgQueryBuilder {
    let mut qb = PgQueryBuilder::new("SELECT count(*) FROM member m");
    push_query_joins(&mut qb, spec, &Sort::unsorted());
    push_where(&mut qb, spec);
    qb
}
