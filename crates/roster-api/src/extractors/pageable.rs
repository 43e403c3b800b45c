//! Page request extractor
//!
//! Turns `?page=&size=&sort=` into a [`PageRequest`] over member fields.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use roster_core::query::{MemberField, PageRequest, Sort};
use serde::Deserialize;

use crate::response::ApiError;

/// Page size when none is requested
pub const DEFAULT_PAGE_SIZE: u32 = 5;
/// Largest accepted page size
pub const MAX_PAGE_SIZE: u32 = 100;
/// Ordering when none is requested
pub const DEFAULT_SORT: &str = "username";

/// Raw paging query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PageableParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
    /// `property[,asc|desc]`, several separated by `;`
    #[serde(default)]
    pub sort: Option<String>,
}

/// Validated page request
#[derive(Debug, Clone)]
pub struct Pageable(pub PageRequest<MemberField>);

impl Pageable {
    pub fn request(&self) -> &PageRequest<MemberField> {
        &self.0
    }
}

impl TryFrom<PageableParams> for Pageable {
    type Error = ApiError;

    fn try_from(params: PageableParams) -> Result<Self, Self::Error> {
        let page = params.page.unwrap_or(0);
        let size = params
            .size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let sort = match params.sort.as_deref().map(str::trim) {
            Some(sort) if !sort.is_empty() => Sort::parse(sort)?,
            _ => Sort::parse(DEFAULT_SORT)?,
        };

        Ok(Pageable(PageRequest::sorted(page, size, sort)))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pageable
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PageableParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Pageable::try_from(params)
    }
}
