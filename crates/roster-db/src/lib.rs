//! # roster-db
//!
//! Database layer implementing the repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the repository traits
//! defined in `roster-core`. It handles:
//!
//! - Connection pool management and the schema migration
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Rendering specifications, sorts and pages to SQL
//! - Repository implementations
//! - A transaction-scoped unit of work ([`PgSession`])
//!
//! ## Usage
//!
//! ```rust,ignore
//! use roster_db::{create_pool, migrate, DatabaseConfig, PgMemberRepository};
//! use roster_core::traits::MemberRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::from_env()?).await?;
//!     migrate(&pool).await?;
//!     let members = PgMemberRepository::init(pool).await?;
//!
//!     let top = members.find_top3().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod session;
pub mod sql;

// Re-export commonly used types
pub use pool::{create_pool, migrate, DatabaseConfig, PgPool};
pub use repositories::{
    ClosedProjection, PgItemRepository, PgMemberQueryRepository, PgMemberRepository,
    PgTeamRepository,
};
pub use session::PgSession;
