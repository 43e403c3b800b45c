//! Team entity

use crate::value_objects::TeamId;

use super::audit::Persistable;

/// Team entity. Teams do not track their members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: Option<TeamId>,
    pub name: String,
}

impl Team {
    /// Create a transient team
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

impl Persistable for Team {
    fn is_new(&self) -> bool {
        self.id.is_none()
    }
}
