//! Identity Mapper
//!
//! Stable integer identity over replaceable node handles. A host may hand
//! out a fresh handle for the same logical element on every render pass, so
//! ids are keyed on the host's stable identity key and re-pointed at the
//! newest handle on update. Downstream observers keep a single id for the
//! whole lifetime of the logical node; the indirection table here is the
//! only place the association lives.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Integer identity assigned to a visible node.
///
/// Ids are allocated monotonically from 1 and never reused for a different
/// logical node while the mapping is alive. [`Id::NONE`] is the sentinel for
/// "not mapped" and "no visible ancestor".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(pub i32);

impl Id {
    /// Sentinel for an unmapped node or an absent ancestor.
    pub const NONE: Id = Id(-1);

    /// Whether this is a real assigned id rather than the sentinel.
    pub fn is_some(self) -> bool {
        self != Id::NONE
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Bidirectional id registry for one observed tree.
#[derive(Debug)]
pub struct IdMap<K, N> {
    key_to_id: HashMap<K, Id>,
    id_to_node: HashMap<Id, N>,
    id_to_key: HashMap<Id, K>,
    next: i32,
}

impl<K, N> IdMap<K, N>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            key_to_id: HashMap::new(),
            id_to_node: HashMap::new(),
            id_to_key: HashMap::new(),
            next: 1,
        }
    }

    /// Id for `key`, allocating the next integer when unseen. The newest
    /// node handle is recorded either way.
    pub fn get_or_create(&mut self, key: K, node: N) -> Id {
        if let Some(&id) = self.key_to_id.get(&key) {
            self.id_to_node.insert(id, node);
            return id;
        }
        let id = Id(self.next);
        self.next += 1;
        self.key_to_id.insert(key.clone(), id);
        self.id_to_key.insert(id, key);
        self.id_to_node.insert(id, node);
        id
    }

    /// Id for `key`, [`Id::NONE`] when unmapped. Absence is an expected
    /// state for hidden nodes, not an error.
    pub fn id_for(&self, key: &K) -> Id {
        self.key_to_id.get(key).copied().unwrap_or(Id::NONE)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.key_to_id.contains_key(key)
    }

    /// Re-point an existing id at the current handle for the same logical
    /// element. The handle recorded before this call stays reachable through
    /// [`IdMap::node_for`] until the call happens, which is what child-list
    /// diffing reads.
    pub fn reassign(&mut self, id: Id, key: K, node: N) {
        self.key_to_id.insert(key.clone(), id);
        self.id_to_key.insert(id, key);
        self.id_to_node.insert(id, node);
    }

    /// Newest handle recorded for `id`.
    pub fn node_for(&self, id: Id) -> Option<&N> {
        self.id_to_node.get(&id)
    }

    /// Evict a mapping once its node unmounts, returning the key and last
    /// handle. A logical node remounted later gets a fresh id.
    pub fn remove(&mut self, id: Id) -> Option<(K, N)> {
        let key = self.id_to_key.remove(&id)?;
        self.key_to_id.remove(&key);
        let node = self.id_to_node.remove(&id)?;
        Some((key, node))
    }

    pub fn len(&self) -> usize {
        self.key_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_to_id.is_empty()
    }
}

impl<K, N> Default for IdMap<K, N>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_allocate_monotonically_from_one() {
        let mut ids: IdMap<u32, &str> = IdMap::new();
        assert_eq!(ids.get_or_create(10, "a"), Id(1));
        assert_eq!(ids.get_or_create(20, "b"), Id(2));
        assert_eq!(ids.get_or_create(30, "c"), Id(3));
    }

    #[test]
    fn test_get_or_create_is_idempotent_per_key() {
        let mut ids: IdMap<u32, &str> = IdMap::new();
        let first = ids.get_or_create(10, "v1");
        let second = ids.get_or_create(10, "v2");
        assert_eq!(first, second);
        assert_eq!(ids.node_for(first), Some(&"v2"));
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn test_unmapped_key_yields_sentinel() {
        let ids: IdMap<u32, &str> = IdMap::new();
        assert_eq!(ids.id_for(&99), Id::NONE);
        assert!(!ids.contains(&99));
        assert!(!Id::NONE.is_some());
    }

    #[test]
    fn test_reassign_keeps_id_across_handle_replacement() {
        let mut ids: IdMap<u32, &str> = IdMap::new();
        let id = ids.get_or_create(10, "old");
        ids.reassign(id, 10, "new");
        assert_eq!(ids.id_for(&10), id);
        assert_eq!(ids.node_for(id), Some(&"new"));
    }

    #[test]
    fn test_remove_evicts_all_directions() {
        let mut ids: IdMap<u32, &str> = IdMap::new();
        let id = ids.get_or_create(10, "a");
        let removed = ids.remove(id);
        assert_eq!(removed, Some((10, "a")));
        assert_eq!(ids.id_for(&10), Id::NONE);
        assert_eq!(ids.node_for(id), None);
        assert!(ids.is_empty());
    }

    #[test]
    fn test_removed_id_is_not_reused_for_other_keys() {
        let mut ids: IdMap<u32, &str> = IdMap::new();
        let first = ids.get_or_create(10, "a");
        ids.remove(first);
        let second = ids.get_or_create(20, "b");
        assert_ne!(first, second);
    }
}
