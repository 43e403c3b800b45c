//! Identity map with snapshot-based dirty checking

use std::collections::HashMap;
use std::hash::Hash;

/// A managed entity and the state it had when last synchronised
#[derive(Debug, Clone)]
struct Managed<E> {
    current: E,
    /// `None` for read-only entities, which are never considered dirty
    snapshot: Option<E>,
}

/// Tracks the entities loaded or persisted in one unit of work.
///
/// Each key maps to exactly one instance. Registering a key that is already
/// managed keeps the managed instance and discards the incoming one, which
/// is what makes repeated lookups return the same object. It also means
/// that rows changed in the store behind the map's back (a bulk `UPDATE`)
/// are not seen until the map is cleared.
#[derive(Debug, Clone)]
pub struct IdentityMap<K, E> {
    entries: HashMap<K, Managed<E>>,
}

impl<K, E> Default for IdentityMap<K, E> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K, E> IdentityMap<K, E>
where
    K: Eq + Hash + Copy + Ord,
    E: Clone + PartialEq,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Manage `entity` with a snapshot for dirty checking.
    ///
    /// Returns the managed instance, which is the existing one when `key`
    /// is already present.
    pub fn register(&mut self, key: K, entity: E) -> &E {
        &self
            .entries
            .entry(key)
            .or_insert_with(|| Managed {
                snapshot: Some(entity.clone()),
                current: entity,
            })
            .current
    }

    /// Manage `entity` without a snapshot; its changes are never flushed
    pub fn register_read_only(&mut self, key: K, entity: E) -> &E {
        &self
            .entries
            .entry(key)
            .or_insert(Managed {
                current: entity,
                snapshot: None,
            })
            .current
    }

    pub fn get(&self, key: &K) -> Option<&E> {
        self.entries.get(key).map(|managed| &managed.current)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut E> {
        self.entries.get_mut(key).map(|managed| &mut managed.current)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_read_only(&self, key: &K) -> bool {
        self.entries
            .get(key)
            .is_some_and(|managed| managed.snapshot.is_none())
    }

    /// Keys whose current state differs from the snapshot, in key order
    pub fn dirty_keys(&self) -> Vec<K> {
        let mut keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, managed)| {
                managed
                    .snapshot
                    .as_ref()
                    .is_some_and(|snapshot| *snapshot != managed.current)
            })
            .map(|(key, _)| *key)
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Replace the managed state and snapshot after a successful write
    pub fn mark_clean(&mut self, key: &K, entity: E) {
        if let Some(managed) = self.entries.get_mut(key) {
            if managed.snapshot.is_some() {
                managed.snapshot = Some(entity.clone());
            }
            managed.current = entity;
        }
    }

    /// Stop managing one entity, returning its last state
    pub fn detach(&mut self, key: &K) -> Option<E> {
        self.entries.remove(key).map(|managed| managed.current)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
