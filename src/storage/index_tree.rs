//! Secondary index structure
//!
//! Maps an indexed value to the primary keys of the records holding it.
//! Keys per value are kept sorted ascending, so lookups return records in
//! primary key order.

use std::collections::BTreeMap;

use super::key::StoreKey;

/// A single secondary index
#[derive(Debug, Clone, Default)]
pub struct IndexTree {
    tree: BTreeMap<StoreKey, Vec<StoreKey>>,
}

impl IndexTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key` under `value`. Idempotent.
    pub fn insert(&mut self, value: StoreKey, key: StoreKey) {
        let keys = self.tree.entry(value).or_default();
        if let Err(pos) = keys.binary_search(&key) {
            keys.insert(pos, key);
        }
    }

    /// Removes `key` from `value`, dropping the value once it has no keys.
    pub fn remove(&mut self, value: &StoreKey, key: &StoreKey) {
        if let Some(keys) = self.tree.get_mut(value) {
            if let Ok(pos) = keys.binary_search(key) {
                keys.remove(pos);
            }
            if keys.is_empty() {
                self.tree.remove(value);
            }
        }
    }

    /// Primary keys stored under `value`, ascending
    pub fn lookup_eq(&self, value: &StoreKey) -> Vec<StoreKey> {
        self.tree.get(value).cloned().unwrap_or_default()
    }

    /// Number of distinct indexed values
    pub fn value_count(&self) -> usize {
        self.tree.len()
    }

    /// Total number of entries
    pub fn entry_count(&self) -> usize {
        self.tree.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> StoreKey {
        StoreKey::String(v.to_string())
    }

    #[test]
    fn test_keys_sorted_per_value() {
        let mut tree = IndexTree::new();
        tree.insert(s("animal"), StoreKey::Int(9));
        tree.insert(s("animal"), StoreKey::Int(2));
        tree.insert(s("animal"), StoreKey::Int(5));
        tree.insert(s("food"), StoreKey::Int(4));

        assert_eq!(
            tree.lookup_eq(&s("animal")),
            vec![StoreKey::Int(2), StoreKey::Int(5), StoreKey::Int(9)]
        );
        assert_eq!(tree.lookup_eq(&s("fruit")), vec![]);
    }

    #[test]
    fn test_insert_idempotent() {
        let mut tree = IndexTree::new();
        tree.insert(s("a"), StoreKey::Int(1));
        tree.insert(s("a"), StoreKey::Int(1));
        assert_eq!(tree.entry_count(), 1);
    }

    #[test]
    fn test_remove_drops_empty_value() {
        let mut tree = IndexTree::new();
        tree.insert(s("a"), StoreKey::Int(1));
        tree.insert(s("a"), StoreKey::Int(2));

        tree.remove(&s("a"), &StoreKey::Int(1));
        assert_eq!(tree.lookup_eq(&s("a")), vec![StoreKey::Int(2)]);

        tree.remove(&s("a"), &StoreKey::Int(2));
        assert_eq!(tree.value_count(), 0);
    }
}
