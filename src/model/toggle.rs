use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

/// Copy-on-write set of UI flags (expanded tasks, collapsed groups).
///
/// Every toggle yields a new set with a bumped version, so derived data can
/// be cached on the version alone.
#[derive(Debug, Clone)]
pub struct ToggleSet<K> {
    items: Arc<HashSet<K>>,
    version: u64,
}

impl<K: Eq + Hash + Clone> ToggleSet<K> {
    pub fn new() -> Self {
        Self {
            items: Arc::new(HashSet::new()),
            version: 0,
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.items.contains(key)
    }

    /// A set with `key` flipped; `self` is left untouched.
    pub fn toggled(&self, key: &K) -> Self {
        let mut items = HashSet::clone(&self.items);
        if !items.remove(key) {
            items.insert(key.clone());
        }
        Self {
            items: Arc::new(items),
            version: self.version + 1,
        }
    }

    /// A set holding exactly `keys`, versioned after `self`.
    pub fn replaced_with(&self, keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            items: Arc::new(keys.into_iter().collect()),
            version: self.version + 1,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.items.iter()
    }
}

impl<K: Eq + Hash + Clone> Default for ToggleSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for ToggleSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            items: Arc::new(iter.into_iter().collect()),
            version: 0,
        }
    }
}
