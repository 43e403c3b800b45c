//! Database models - SQLx-compatible structs for PostgreSQL tables

mod item;
mod member;
mod team;

pub use item::ItemModel;
pub use member::{MemberModel, MemberSummaryModel, MemberWithTeamModel};
pub use team::TeamModel;
