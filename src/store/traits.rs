//! Storage backends for frequency distributions.
//!
//! Stores own the key → count mapping and guarantee key uniqueness; the
//! distribution layered on top maintains the sum of frequencies and the
//! mutation contract. This keeps the counting logic independent of how
//! counts are stored (hash map, open-addressing primitive arrays).

use crate::error::InvariantError;
use crate::traits::Count;

/// Core store operations common to all backends.
///
/// Every key appears at most once. Sorted export relies on this and only
/// re-verifies it with a single linear scan.
pub trait CountStore<K, C: Count> {
    /// Borrowing iterator over `(key, count)` pairs in backing-store order.
    type Iter<'a>: Iterator<Item = (&'a K, C)>
    where
        Self: 'a,
        K: 'a;

    /// Fetch the count stored for `key`.
    fn get(&self, key: &K) -> Option<C>;

    /// Mutable access to the count stored for `key`.
    fn get_mut(&mut self, key: &K) -> Option<&mut C>;

    /// Check if a key exists.
    fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace a count. Returns the previous count if present.
    fn insert(&mut self, key: K, count: C) -> Option<C>;

    /// Remove a key, returning its count.
    fn remove(&mut self, key: &K) -> Option<C>;

    /// Current number of entries.
    fn len(&self) -> usize;

    /// Check if the store is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all entries.
    fn clear(&mut self);

    /// Iterate entries in backing-store order.
    fn iter(&self) -> Self::Iter<'_>;

    /// Validates backend-specific structure (probe chains, length counters).
    fn check_structure(&self) -> Result<(), InvariantError> {
        Ok(())
    }
}

/// Factory trait for creating store instances.
pub trait StoreFactory {
    /// Create an empty store sized for roughly `capacity` entries.
    fn with_capacity(capacity: usize) -> Self;
}
