//! Typed field references
//!
//! Filters and sort orders never carry raw column names. Each entity has an
//! enum of the properties that may be queried, and the enum knows the SQL
//! column and any join required to reach it.

use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// An association join needed to reach a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Join {
    pub table: &'static str,
    pub alias: &'static str,
    pub on: &'static str,
}

/// The member → team association
pub const MEMBER_TEAM_JOIN: Join = Join {
    table: "team",
    alias: "t",
    on: "t.team_id = m.team_id",
};

/// A queryable property of an entity.
///
/// `FromStr` resolves the external property name.
pub trait Field:
    Copy + Eq + fmt::Debug + FromStr<Err = DomainError> + Send + Sync + 'static
{
    /// Qualified SQL column, e.g. `m.username`
    fn column(&self) -> &'static str;

    /// Join that must be present for [`column`](Field::column) to resolve
    fn join(&self) -> Option<Join> {
        None
    }

    /// Property name used by external callers (sort parameters, errors)
    fn name(&self) -> &'static str;

    /// Every field of the entity
    fn all() -> &'static [Self];

    /// Resolve an external property name, case-insensitively
    fn from_name(name: &str) -> Result<Self, DomainError> {
        let trimmed = name.trim();
        Self::all()
            .iter()
            .copied()
            .find(|field| field.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainError::InvalidSort(trimmed.to_string()))
    }
}

/// Queryable member properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberField {
    Id,
    Username,
    Age,
    TeamId,
    TeamName,
    CreatedDate,
    LastModifiedDate,
    CreatedBy,
    LastModifiedBy,
}

impl Field for MemberField {
    fn column(&self) -> &'static str {
        match self {
            Self::Id => "m.member_id",
            Self::Username => "m.username",
            Self::Age => "m.age",
            Self::TeamId => "m.team_id",
            Self::TeamName => "t.name",
            Self::CreatedDate => "m.created_date",
            Self::LastModifiedDate => "m.last_modified_date",
            Self::CreatedBy => "m.created_by",
            Self::LastModifiedBy => "m.last_modified_by",
        }
    }

    fn join(&self) -> Option<Join> {
        match self {
            Self::TeamName => Some(MEMBER_TEAM_JOIN),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Username => "username",
            Self::Age => "age",
            Self::TeamId => "team.id",
            Self::TeamName => "team.name",
            Self::CreatedDate => "createdDate",
            Self::LastModifiedDate => "lastModifiedDate",
            Self::CreatedBy => "createdBy",
            Self::LastModifiedBy => "lastModifiedBy",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::Id,
            Self::Username,
            Self::Age,
            Self::TeamId,
            Self::TeamName,
            Self::CreatedDate,
            Self::LastModifiedDate,
            Self::CreatedBy,
            Self::LastModifiedBy,
        ]
    }
}

impl FromStr for MemberField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Queryable team properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamField {
    Id,
    Name,
}

impl Field for TeamField {
    fn column(&self) -> &'static str {
        match self {
            Self::Id => "t.team_id",
            Self::Name => "t.name",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
        }
    }

    fn all() -> &'static [Self] {
        &[Self::Id, Self::Name]
    }
}

impl FromStr for TeamField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
