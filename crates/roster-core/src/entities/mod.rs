//! Domain entities - core business objects

mod audit;
mod item;
mod member;
mod team;

pub use audit::{AuditFields, Persistable};
pub use item::Item;
pub use member::{Member, MemberWithTeam};
pub use team::Team;
