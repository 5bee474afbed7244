//! An ordered key/value map built from [`RbTree`] plus owning/shared
//! pointers for the key and value respectively.

use std::cmp::Ordering;

use crate::ptr::{SharedPtr, UniquePtr};
use crate::tree::RbTree;

struct MapEntry<K, V> {
    key: UniquePtr<K>,
    value: SharedPtr<V>,
}

impl<K, V> MapEntry<K, V> {
    fn key(&self) -> &K {
        self.key.get().expect("map entry always owns its key")
    }
}

impl<K: Eq, V> PartialEq for MapEntry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<K: Eq, V> Eq for MapEntry<K, V> {}

impl<K: Ord, V> PartialOrd for MapEntry<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, V> Ord for MapEntry<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(other.key())
    }
}

/// A map from `K` to `V`, backed by a red-black tree of `{ owning_key,
/// shared_value }` entries ordered by key.
pub struct Map<K, V> {
    tree: RbTree<MapEntry<K, V>>,
}

impl<K: Ord, V> Map<K, V> {
    pub fn new() -> Self {
        Self { tree: RbTree::new() }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Inserts `key`/`value` if `key` isn't already present. If it is,
    /// the existing entry is left untouched and `key`/`value` are
    /// returned to the caller rather than silently dropped.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), (K, V)> {
        if self.tree.find_by(|e| key.cmp(e.key())).is_some() {
            return Err((key, value));
        }

        let mut entry_key = UniquePtr::new();
        entry_key.alloc(key, None);
        let mut entry_value = SharedPtr::new();
        entry_value.alloc(value, None);

        self.tree.insert(MapEntry {
            key: entry_key,
            value: entry_value,
        });
        Ok(())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn find(&self, key: &K) -> Option<&V> {
        self.tree
            .find_by(|e| key.cmp(e.key()))
            .and_then(|e| e.value.get())
    }

    /// A [`SharedPtr`] clone sharing ownership of the value, letting the
    /// map outlive a caller's independent reference to it.
    pub fn find_shared(&self, key: &K) -> Option<SharedPtr<V>> {
        self.tree
            .find_by(|e| key.cmp(e.key()))
            .map(|e| e.value.clone())
    }

    pub fn erase(&mut self, key: &K) -> Option<(K, SharedPtr<V>)> {
        let mut entry = self.tree.erase_by(|e| key.cmp(e.key()))?;
        let (k, _) = entry.key.release().expect("erased entry always owns its key");
        Some((k, std::mem::replace(&mut entry.value, SharedPtr::new())))
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }
}

impl<K: Ord, V> Default for Map<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_find_erase() {
        let mut m: Map<String, i32> = Map::new();
        assert!(m.insert("a".to_string(), 1).is_ok());
        assert!(m.insert("b".to_string(), 2).is_ok());
        assert_eq!(m.len(), 2);

        assert_eq!(m.find(&"a".to_string()), Some(&1));
        assert_eq!(m.find(&"z".to_string()), None);

        let (k, v) = m.erase(&"a".to_string()).unwrap();
        assert_eq!(k, "a");
        assert_eq!(v.get(), Some(&1));
        assert_eq!(m.len(), 1);
        assert!(m.find(&"a".to_string()).is_none());
    }

    #[test]
    fn insert_existing_key_returns_inputs() {
        let mut m: Map<i32, i32> = Map::new();
        m.insert(1, 10).unwrap();
        let err = m.insert(1, 20).unwrap_err();
        assert_eq!(err, (1, 20));
        assert_eq!(m.find(&1), Some(&10));
    }

    #[test]
    fn find_shared_keeps_value_alive_after_erase() {
        let mut m: Map<i32, i32> = Map::new();
        m.insert(1, 99).unwrap();
        let shared = m.find_shared(&1).unwrap();
        m.erase(&1);
        assert_eq!(shared.get(), Some(&99));
    }

    #[test]
    fn clear_empties_map() {
        let mut m: Map<i32, i32> = (0..20).map(|i| (i, i * i)).fold(Map::new(), |mut acc, (k, v)| {
            acc.insert(k, v).unwrap();
            acc
        });
        assert_eq!(m.len(), 20);
        m.clear();
        assert!(m.is_empty());
    }
}
