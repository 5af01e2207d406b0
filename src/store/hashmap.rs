//! HashMap-backed count store for arbitrary keys.
//!
//! ## Architecture
//! - Keys are stored in an `FxHashMap<K, C>` for O(1) average lookup.
//! - Counts are stored inline; there is no per-entry allocation beyond the key.
//! - Iteration follows hash-table order, which is unspecified and may change
//!   after any insertion.
//!
//! ## Example Usage
//! ```rust
//! use freqkit::store::hashmap::HashMapStore;
//! use freqkit::store::traits::CountStore;
//!
//! let mut store: HashMapStore<String, i32> = HashMapStore::new();
//! store.insert("term".to_string(), 3);
//! assert_eq!(store.get(&"term".to_string()), Some(3));
//! ```
//!
//! ## Type Constraints
//! - `K: Eq + Hash` for key lookup.
use std::collections::hash_map;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::store::traits::{CountStore, StoreFactory};
use crate::traits::Count;

/// Single-threaded HashMap-backed count store.
#[derive(Debug, Clone)]
pub struct HashMapStore<K, C> {
    map: FxHashMap<K, C>,
}

impl<K, C> HashMapStore<K, C>
where
    K: Eq + Hash,
    C: Count,
{
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    /// Return the backing hash map capacity.
    pub fn map_capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Iterate stored keys.
    pub fn keys(&self) -> hash_map::Keys<'_, K, C> {
        self.map.keys()
    }
}

impl<K, C> Default for HashMapStore<K, C>
where
    K: Eq + Hash,
    C: Count,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> StoreFactory for HashMapStore<K, C>
where
    K: Eq + Hash,
    C: Count,
{
    fn with_capacity(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }
}

impl<K, C> CountStore<K, C> for HashMapStore<K, C>
where
    K: Eq + Hash,
    C: Count,
{
    type Iter<'a>
        = HashMapStoreIter<'a, K, C>
    where
        Self: 'a,
        K: 'a;

    #[inline]
    fn get(&self, key: &K) -> Option<C> {
        self.map.get(key).copied()
    }

    #[inline]
    fn get_mut(&mut self, key: &K) -> Option<&mut C> {
        self.map.get_mut(key)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn insert(&mut self, key: K, count: C) -> Option<C> {
        self.map.insert(key, count)
    }

    fn remove(&mut self, key: &K) -> Option<C> {
        self.map.remove(key)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn clear(&mut self) {
        self.map.clear();
    }

    fn iter(&self) -> Self::Iter<'_> {
        HashMapStoreIter {
            inner: self.map.iter(),
        }
    }
}

/// Iterator over a [`HashMapStore`] yielding counts by value.
#[derive(Debug, Clone)]
pub struct HashMapStoreIter<'a, K, C> {
    inner: hash_map::Iter<'a, K, C>,
}

impl<'a, K, C: Copy> Iterator for HashMapStoreIter<'a, K, C> {
    type Item = (&'a K, C);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, count)| (key, *count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, C: Copy> ExactSizeIterator for HashMapStoreIter<'_, K, C> {}
