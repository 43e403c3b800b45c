//! Surrogate identifiers assigned by the database
//!
//! Members and teams receive their identity from a `BIGSERIAL` column on
//! first insert. Items carry a caller-supplied string key instead and do not
//! use these types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error when parsing an identifier from its string representation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("invalid identifier format: {0}")]
    InvalidFormat(String),

    #[error("identifier must be positive: {0}")]
    NotPositive(i64),
}

macro_rules! surrogate_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw database key
            #[inline]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the inner i64 value
            #[inline]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| IdParseError::InvalidFormat(s.to_string()))?;
                if raw <= 0 {
                    return Err(IdParseError::NotPositive(raw));
                }
                Ok(Self(raw))
            }
        }
    };
}

surrogate_id!(
    /// Identity of a persisted member
    MemberId
);

surrogate_id!(
    /// Identity of a persisted team
    TeamId
);
