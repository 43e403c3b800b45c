//! Item entity - keyed by a caller-supplied string

use chrono::{DateTime, Utc};

use super::audit::Persistable;

/// Item entity.
///
/// The id is assigned by the caller, so it is present before the first
/// insert and cannot tell a new item from a stored one. The creation
/// timestamp is used instead: it is empty until the item has been inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub created_date: Option<DateTime<Utc>>,
}

impl Item {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_date: None,
        }
    }
}

impl Persistable for Item {
    fn is_new(&self) -> bool {
        self.created_date.is_none()
    }
}
