//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{MemberId, TeamId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    // =========================================================================
    // Query Errors
    // =========================================================================
    /// A finder declared to return at most one row matched several
    #[error("Query '{query}' expected at most one result but found {count}")]
    NonUniqueResult { query: &'static str, count: usize },

    /// An explicit query string was rejected during repository initialization
    #[error("Invalid query '{name}': {reason}")]
    InvalidQuery { name: &'static str, reason: String },

    #[error("Invalid sort property: {0}")]
    InvalidSort(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("No auditor available for write operation")]
    MissingAuditor,

    #[error("Entity is not persisted yet: {0}")]
    TransientEntity(&'static str),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Item already exists: {0}")]
    ItemAlreadyExists(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::MemberNotFound(_) => "UNKNOWN_MEMBER",
            Self::TeamNotFound(_) => "UNKNOWN_TEAM",
            Self::ItemNotFound(_) => "UNKNOWN_ITEM",

            // Query
            Self::NonUniqueResult { .. } => "NON_UNIQUE_RESULT",
            Self::InvalidQuery { .. } => "INVALID_QUERY",
            Self::InvalidSort(_) => "INVALID_SORT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::MissingAuditor => "MISSING_AUDITOR",
            Self::TransientEntity(_) => "TRANSIENT_ENTITY",

            // Conflict
            Self::ItemAlreadyExists(_) => "ITEM_ALREADY_EXISTS",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MemberNotFound(_) | Self::TeamNotFound(_) | Self::ItemNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidSort(_)
                | Self::MissingAuditor
                | Self::TransientEntity(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ItemAlreadyExists(_) | Self::NonUniqueResult { .. })
    }
}
