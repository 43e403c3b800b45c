//! Member handlers

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use roster_core::entities::Member;
use roster_core::projections::MemberDto;
use roster_core::query::{Field, Page, PageRequest};
use roster_core::traits::CrudRepository;
use roster_core::value_objects::TeamId;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::extractors::{Actor, MemberIdPath, Pageable, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Body of `POST /members`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMemberRequest {
    #[validate(length(min = 1, max = 255, message = "username must be 1-255 characters"))]
    pub username: String,
    #[validate(range(min = 0, max = 200, message = "age must be between 0 and 200"))]
    #[serde(default)]
    pub age: i32,
    #[serde(default)]
    pub team_id: Option<i64>,
}

/// One page of results with its paging metadata
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub number_of_elements: usize,
    pub total_elements: i64,
    pub total_pages: i64,
    pub first: bool,
    pub last: bool,
    pub has_next: bool,
    /// Page numbers to request for the neighbouring pages, when they exist
    pub previous: Option<u32>,
    pub next: Option<u32>,
}

impl<T> PageResponse<T> {
    pub fn new<F: Field>(page: Page<T>, request: &PageRequest<F>) -> Self {
        Self {
            number: page.number(),
            size: page.size(),
            number_of_elements: page.number_of_elements(),
            total_elements: page.total_elements(),
            total_pages: page.total_pages(),
            first: page.is_first(),
            last: page.is_last(),
            has_next: page.has_next(),
            previous: page
                .has_previous()
                .then(|| request.previous_or_first().page()),
            next: page.has_next().then(|| request.next().page()),
            content: page.into_content(),
        }
    }
}

/// Username of one member, as plain text
///
/// GET /members/{id}
#[instrument(skip(state))]
pub async fn get_member_username(
    State(state): State<AppState>,
    MemberIdPath(id): MemberIdPath,
) -> ApiResult<impl IntoResponse> {
    let member = state
        .members()
        .find_by_id(id)
        .await?
        .ok_or(roster_core::DomainError::MemberNotFound(id))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        member.username,
    ))
}

/// Page of members with their team names
///
/// GET /members?page=&size=&sort=
#[instrument(skip(state))]
pub async fn list_members(
    State(state): State<AppState>,
    Pageable(request): Pageable,
) -> ApiResult<Json<PageResponse<MemberDto>>> {
    let page = state.member_queries().find_member_summaries(&request).await?;
    Ok(Json(PageResponse::new(page, &request)))
}

/// Create a member, optionally in an existing team
///
/// POST /members
#[instrument(skip_all)]
pub async fn create_member(
    State(state): State<AppState>,
    actor: Actor,
    ValidatedJson(request): ValidatedJson<CreateMemberRequest>,
) -> ApiResult<Created<MemberDto>> {
    let mut member = Member::new(request.username, request.age);

    let team = match request.team_id {
        Some(raw) => {
            let team_id = TeamId::new(raw);
            let team = state
                .teams()
                .find_by_id(team_id)
                .await?
                .ok_or(roster_core::DomainError::TeamNotFound(team_id))?;
            member.change_team(&team);
            Some(team)
        }
        None => None,
    };

    let saved = state.members().save(member, actor.audit()).await?;
    info!(
        member_id = ?saved.id,
        username = %saved.username,
        actor = actor.audit().actor(),
        "Member created"
    );

    let dto = MemberDto {
        id: saved.id,
        username: saved.username,
        team_name: team.map(|team| team.name),
    };
    Ok(Created(dto))
}
