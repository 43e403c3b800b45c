//! Integration test utilities for the roster workspace
//!
//! Every test runs against its own PostgreSQL schema, created on demand and
//! dropped on cleanup, so tests can run in parallel against one database.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
