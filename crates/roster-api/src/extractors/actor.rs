//! Acting-user extractor
//!
//! Resolves who performs a write: the `x-actor-id` header when present,
//! otherwise the application's default auditor.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use roster_core::auditing::AuditContext;

use crate::response::ApiError;
use crate::state::AppState;

/// Header naming the acting user
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Audit context for the current request
#[derive(Debug, Clone)]
pub struct Actor(pub AuditContext);

impl Actor {
    pub fn audit(&self) -> &AuditContext {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ACTOR_HEADER)
            .map(|value| {
                value
                    .to_str()
                    .map(str::trim)
                    .map_err(|_| ApiError::InvalidHeader(format!("{ACTOR_HEADER} is not valid text")))
            })
            .transpose()?
            .filter(|actor| !actor.is_empty());

        if let Some(actor) = header {
            return Ok(Actor(AuditContext::new(actor)));
        }

        let app_state = AppState::from_ref(state);
        let audit = AuditContext::from_auditor(app_state.auditor())?;
        Ok(Actor(audit))
    }
}
