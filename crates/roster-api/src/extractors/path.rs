//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use roster_core::value_objects::MemberId;

use crate::response::ApiError;

/// `/members/:id`, parsed to a [`MemberId`]
#[derive(Debug, Clone, Copy)]
pub struct MemberIdPath(pub MemberId);

#[async_trait]
impl<S> FromRequestParts<S> for MemberIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        raw.parse::<MemberId>()
            .map(MemberIdPath)
            .map_err(|e| ApiError::invalid_path(e.to_string()))
    }
}
