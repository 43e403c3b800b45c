//! Auditing - who changed an entity and when
//!
//! There is no process-wide listener. Every write path receives an
//! [`AuditContext`] naming the acting user and the instant of the write,
//! and stamps it onto the entity's [`AuditFields`](crate::entities::AuditFields).
//! Where the actor comes from (a request header, a session, a fixed system
//! account) is decided by an [`AuditorAware`] implementation at the edge.

mod context;

pub use context::{AuditContext, AuditorAware, FixedAuditor, RandomAuditor};
