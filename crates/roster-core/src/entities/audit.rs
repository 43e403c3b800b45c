//! Shared audit columns and the new-versus-persisted rule

use chrono::{DateTime, Utc};

use crate::auditing::AuditContext;

/// Creation and modification metadata carried by audited entities
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFields {
    pub created_date: Option<DateTime<Utc>>,
    pub last_modified_date: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub last_modified_by: Option<String>,
}

impl AuditFields {
    /// Stamp creation and modification with the same actor and instant
    pub fn on_create(&mut self, ctx: &AuditContext) {
        self.created_date = Some(ctx.now());
        self.created_by = Some(ctx.actor().to_string());
        self.last_modified_date = Some(ctx.now());
        self.last_modified_by = Some(ctx.actor().to_string());
    }

    /// Stamp modification only; creation columns are immutable
    pub fn on_update(&mut self, ctx: &AuditContext) {
        self.last_modified_date = Some(ctx.now());
        self.last_modified_by = Some(ctx.actor().to_string());
    }
}

/// Decides whether `save` inserts or merges.
///
/// Entities with a generated key are new while the key is absent. Entities
/// whose key is assigned by the caller need another signal, which is why
/// this is a trait rather than a check on the id.
pub trait Persistable {
    fn is_new(&self) -> bool;
}
