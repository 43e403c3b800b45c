//! Entity to model mappers
//!
//! This module provides conversions between domain entities (roster-core) and database models.
//! - `From<Model> for Entity`: Convert database rows to domain objects
//! - `MemberWrite`: Borrow entity data for inserts and updates

mod item;
mod member;
mod team;

pub use member::MemberWrite;
