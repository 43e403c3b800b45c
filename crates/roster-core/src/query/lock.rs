//! Pessimistic row locks

/// Row lock requested for a read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockMode {
    #[default]
    None,
    /// Shared lock; concurrent writers block until the transaction ends
    PessimisticRead,
    /// Exclusive lock; concurrent readers asking for a lock block as well
    PessimisticWrite,
}

impl LockMode {
    /// Locking clause appended to a `SELECT`
    pub fn sql(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::PessimisticRead => Some("FOR SHARE"),
            Self::PessimisticWrite => Some("FOR UPDATE"),
        }
    }
}
