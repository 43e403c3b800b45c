//! Unit-of-work building blocks that do not depend on a database

mod identity_map;

pub use identity_map::IdentityMap;
