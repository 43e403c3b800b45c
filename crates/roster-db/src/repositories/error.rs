//! Error handling utilities for repositories

use roster_core::error::DomainError;
use roster_core::value_objects::{MemberId, TeamId};
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Map a member write error; a dangling team reference becomes `TeamNotFound`
pub fn map_member_write_error(e: SqlxError, team_id: Option<TeamId>) -> DomainError {
    if let (Some(db_err), Some(team_id)) = (e.as_database_error(), team_id) {
        if db_err.is_foreign_key_violation() {
            return DomainError::TeamNotFound(team_id);
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Reduce the rows of a single-result query.
///
/// No row is `None`; more than one row is a `NonUniqueResult` error naming
/// the query, never a silent pick of the first row.
pub fn single_result<T>(query: &'static str, mut rows: Vec<T>) -> Result<Option<T>, DomainError> {
    match rows.len() {
        0 => Ok(None),
        1 => Ok(rows.pop()),
        count => Err(DomainError::NonUniqueResult { query, count }),
    }
}

/// Create a "member not found" error
pub fn member_not_found(id: MemberId) -> DomainError {
    DomainError::MemberNotFound(id)
}

/// Create a "team not found" error
pub fn team_not_found(id: TeamId) -> DomainError {
    DomainError::TeamNotFound(id)
}

/// Create an "item not found" error
pub fn item_not_found(id: &str) -> DomainError {
    DomainError::ItemNotFound(id.to_string())
}
