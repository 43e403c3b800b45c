//! Audit context and auditor providers

use chrono::{DateTime, SubsecRound, Utc};

use crate::error::DomainError;

/// Supplies the identifier of the user performing a write
pub trait AuditorAware: Send + Sync {
    /// Current actor, or `None` when nobody can be identified
    fn current_auditor(&self) -> Option<String>;
}

/// Always reports the same actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedAuditor(String);

impl FixedAuditor {
    pub fn new(actor: impl Into<String>) -> Self {
        Self(actor.into())
    }
}

impl AuditorAware for FixedAuditor {
    fn current_auditor(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Reports a fresh random UUID on every call.
///
/// Only useful for demos; a real deployment resolves the actor from the
/// request or session.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAuditor;

impl AuditorAware for RandomAuditor {
    fn current_auditor(&self) -> Option<String> {
        Some(uuid::Uuid::new_v4().to_string())
    }
}

/// Actor and timestamp applied to every entity written in one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditContext {
    actor: String,
    now: DateTime<Utc>,
}

impl AuditContext {
    /// Context for `actor` at the current instant
    pub fn new(actor: impl Into<String>) -> Self {
        Self::at(actor, Utc::now())
    }

    /// Context for `actor` at a given instant.
    ///
    /// The instant is truncated to microseconds, the resolution of a
    /// PostgreSQL `TIMESTAMPTZ`, so an entity read back compares equal to the
    /// one that was written.
    pub fn at(actor: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            actor: actor.into(),
            now: now.trunc_subsecs(6),
        }
    }

    /// Resolve the actor through an [`AuditorAware`] provider.
    ///
    /// Writing rows with a null actor is refused.
    pub fn from_auditor(auditor: &dyn AuditorAware) -> Result<Self, DomainError> {
        auditor
            .current_auditor()
            .filter(|actor| !actor.trim().is_empty())
            .map(Self::new)
            .ok_or(DomainError::MissingAuditor)
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
