//! Open-addressing count store for `i32` keys.
//!
//! Keys, counts and occupancy flags live in three parallel primitive arrays,
//! so an entry costs `4 + size_of::<C>() + 1` bytes with no per-entry boxing
//! or hashing state.
//!
//! ## Architecture
//!
//! ```text
//!   mask = capacity - 1            (capacity is always a power of two)
//!
//!   slot:    0      1      2      3      4      5      6      7
//!          ┌──────┬──────┬──────┬──────┬──────┬──────┬──────┬──────┐
//!   keys   │  17  │   ·  │   3  │  11  │   ·  │   ·  │   ·  │  -2  │
//!   counts │   4  │   ·  │   1  │   9  │   ·  │   ·  │   ·  │   2  │
//!   used   │   T  │   F  │   T  │   T  │   F  │   F  │   F  │   T  │
//!          └──────┴──────┴──────┴──────┴──────┴──────┴──────┴──────┘
//!
//!   home(k) = mix(k) & mask; collisions probe linearly to the next slot,
//!   wrapping at the end of the table.
//! ```
//!
//! ## Removal
//!
//! Removal uses backward-shift deletion instead of tombstones: after a slot
//! is vacated, later entries of the same probe run are moved back into it
//! whenever their home slot does not lie cyclically in `(vacated, current]`.
//! Every probe run therefore stays contiguous and lookups stop at the first
//! free slot.
//!
//! ## Growth
//!
//! The table doubles once `len` reaches `max_fill = ceil(capacity * load_factor)`
//! (at most `capacity - 1`, so at least one slot is always free).
//!
//! ## Operations
//!
//! | Operation | Time           | Notes                               |
//! |-----------|----------------|-------------------------------------|
//! | `get`     | O(1) expected  | Stops at first free slot            |
//! | `insert`  | O(1) amortized | May double the table                |
//! | `remove`  | O(1) expected  | Backward shift, no tombstones       |
//! | `iter`    | O(capacity)    | Slot order                          |
//! | `clear`   | O(capacity)    | Keeps the allocation                |

use std::fmt;

use tracing::trace;

use crate::error::{ConfigError, InvariantError};
use crate::store::traits::{CountStore, StoreFactory};
use crate::traits::Count;

/// Default fraction of slots that may be occupied before the table grows.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Default number of expected entries for a fresh table.
pub const DEFAULT_EXPECTED_ENTRIES: usize = 16;

const MIN_TABLE_SIZE: usize = 2;
const MAX_TABLE_SIZE: usize = 1 << (usize::BITS - 2);

/// Spreads the bits of a key so that sequential ids land in distinct slots.
#[inline]
fn mix(key: i32) -> usize {
    let h = (key as u32).wrapping_mul(0x9E37_79B9);
    (h ^ (h >> 16)) as usize
}

/// Smallest power-of-two table holding `expected` entries under `load_factor`.
fn table_size(expected: usize, load_factor: f32) -> usize {
    let wanted = (expected as f64 / f64::from(load_factor)).ceil();
    if wanted >= MAX_TABLE_SIZE as f64 {
        return MAX_TABLE_SIZE;
    }
    (wanted as usize)
        .max(MIN_TABLE_SIZE)
        .checked_next_power_of_two()
        .unwrap_or(MAX_TABLE_SIZE)
}

/// Number of entries a table of `size` slots holds before it grows.
fn max_fill(size: usize, load_factor: f32) -> usize {
    let fill = (size as f64 * f64::from(load_factor)).ceil() as usize;
    fill.min(size - 1)
}

/// Validates a load factor for use with [`OpenIntStore`].
pub(crate) fn validate_load_factor(load_factor: f32) -> Result<(), ConfigError> {
    if load_factor.is_finite() && load_factor > 0.0 && load_factor < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::new(format!(
            "load factor must be in (0, 1), got {load_factor}"
        )))
    }
}

/// Open-addressing `i32 → C` store backed by parallel primitive arrays.
#[derive(Clone)]
pub struct OpenIntStore<C> {
    keys: Vec<i32>,
    counts: Vec<C>,
    used: Vec<bool>,
    mask: usize,
    len: usize,
    max_fill: usize,
    load_factor: f32,
}

impl<C: Count> OpenIntStore<C> {
    /// Creates an empty store with the default load factor.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EXPECTED_ENTRIES)
    }

    /// Creates an empty store with a validated load factor.
    ///
    /// # Example
    ///
    /// ```
    /// use freqkit::store::open_int::OpenIntStore;
    ///
    /// assert!(OpenIntStore::<i32>::try_with_capacity_and_load_factor(100, 0.5).is_ok());
    /// assert!(OpenIntStore::<i32>::try_with_capacity_and_load_factor(100, 1.0).is_err());
    /// ```
    pub fn try_with_capacity_and_load_factor(
        expected: usize,
        load_factor: f32,
    ) -> Result<Self, ConfigError> {
        validate_load_factor(load_factor)?;
        let size = table_size(expected, load_factor);
        let slot_bytes = size_of::<i32>() + size_of::<C>() + size_of::<bool>();
        let fits = size < MAX_TABLE_SIZE
            && size
                .checked_mul(slot_bytes)
                .is_some_and(|bytes| bytes <= isize::MAX as usize);
        if !fits {
            return Err(ConfigError::new(format!(
                "capacity {expected} at load factor {load_factor} needs a table larger than addressable memory"
            )));
        }
        Ok(Self::allocate(size, load_factor))
    }

    fn allocate(size: usize, load_factor: f32) -> Self {
        Self {
            keys: vec![0; size],
            counts: vec![C::ZERO; size],
            used: vec![false; size],
            mask: size - 1,
            len: 0,
            max_fill: max_fill(size, load_factor),
            load_factor,
        }
    }

    /// Number of slots in the table.
    pub fn capacity(&self) -> usize {
        self.keys.len()
    }

    /// Configured load factor.
    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    /// Iterate stored keys in slot order.
    pub fn keys(&self) -> impl Iterator<Item = i32> + '_ {
        self.iter().map(|(key, _)| *key)
    }

    /// Approximate heap bytes held by the table.
    pub fn approx_bytes(&self) -> usize {
        self.capacity() * (size_of::<i32>() + size_of::<C>() + size_of::<bool>())
    }

    /// Slot holding `key`, if present.
    #[inline]
    fn find(&self, key: i32) -> Option<usize> {
        let mut pos = mix(key) & self.mask;
        while self.used[pos] {
            if self.keys[pos] == key {
                return Some(pos);
            }
            pos = (pos + 1) & self.mask;
        }
        None
    }

    /// Moves entries following `pos` back so that no probe run has a hole.
    fn shift_keys(&mut self, mut pos: usize) {
        loop {
            let last = pos;
            pos = (pos + 1) & self.mask;
            loop {
                if !self.used[pos] {
                    self.used[last] = false;
                    return;
                }
                let home = mix(self.keys[pos]) & self.mask;
                let movable = if last <= pos {
                    last >= home || home > pos
                } else {
                    last >= home && home > pos
                };
                if movable {
                    break;
                }
                pos = (pos + 1) & self.mask;
            }
            self.keys[last] = self.keys[pos];
            self.counts[last] = self.counts[pos];
        }
    }

    fn rehash(&mut self, new_size: usize) {
        trace!(
            from = self.capacity(),
            to = new_size,
            len = self.len,
            "growing open-addressing table"
        );
        let mut grown = Self::allocate(new_size, self.load_factor);
        for (key, count) in self.iter() {
            let mut pos = mix(*key) & grown.mask;
            while grown.used[pos] {
                pos = (pos + 1) & grown.mask;
            }
            grown.used[pos] = true;
            grown.keys[pos] = *key;
            grown.counts[pos] = count;
        }
        grown.len = self.len;
        *self = grown;
    }
}

impl<C: Count> Default for OpenIntStore<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Count> fmt::Debug for OpenIntStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenIntStore")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("load_factor", &self.load_factor)
            .finish()
    }
}

impl<C: Count> StoreFactory for OpenIntStore<C> {
    fn with_capacity(capacity: usize) -> Self {
        Self::allocate(
            table_size(capacity, DEFAULT_LOAD_FACTOR),
            DEFAULT_LOAD_FACTOR,
        )
    }
}

impl<C: Count> CountStore<i32, C> for OpenIntStore<C> {
    type Iter<'a>
        = OpenIntIter<'a, C>
    where
        Self: 'a;

    #[inline]
    fn get(&self, key: &i32) -> Option<C> {
        self.find(*key).map(|pos| self.counts[pos])
    }

    #[inline]
    fn get_mut(&mut self, key: &i32) -> Option<&mut C> {
        let pos = self.find(*key)?;
        Some(&mut self.counts[pos])
    }

    #[inline]
    fn contains(&self, key: &i32) -> bool {
        self.find(*key).is_some()
    }

    fn insert(&mut self, key: i32, count: C) -> Option<C> {
        let mut pos = mix(key) & self.mask;
        while self.used[pos] {
            if self.keys[pos] == key {
                return Some(std::mem::replace(&mut self.counts[pos], count));
            }
            pos = (pos + 1) & self.mask;
        }
        self.used[pos] = true;
        self.keys[pos] = key;
        self.counts[pos] = count;
        self.len += 1;
        if self.len >= self.max_fill {
            let doubled = (self.capacity() * 2).min(MAX_TABLE_SIZE);
            self.rehash(doubled);
        }
        None
    }

    fn remove(&mut self, key: &i32) -> Option<C> {
        let pos = self.find(*key)?;
        let count = self.counts[pos];
        self.len -= 1;
        self.shift_keys(pos);
        Some(count)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        if self.len == 0 {
            return;
        }
        self.used.fill(false);
        self.len = 0;
    }

    fn iter(&self) -> Self::Iter<'_> {
        OpenIntIter {
            keys: &self.keys,
            counts: &self.counts,
            used: &self.used,
            pos: 0,
            remaining: self.len,
        }
    }

    fn check_structure(&self) -> Result<(), InvariantError> {
        if !self.capacity().is_power_of_two() {
            return Err(InvariantError::new(format!(
                "table size {} is not a power of two",
                self.capacity()
            )));
        }
        let occupied = self.used.iter().filter(|&&used| used).count();
        if occupied != self.len {
            return Err(InvariantError::new(format!(
                "len {} does not match {} occupied slots",
                self.len, occupied
            )));
        }
        if self.len >= self.capacity() {
            return Err(InvariantError::new("table has no free slot"));
        }
        for (pos, &used) in self.used.iter().enumerate() {
            if used && self.find(self.keys[pos]) != Some(pos) {
                return Err(InvariantError::new(format!(
                    "key {} at slot {} is unreachable from its home slot",
                    self.keys[pos], pos
                )));
            }
        }
        Ok(())
    }
}

/// Iterator over an [`OpenIntStore`] in slot order.
#[derive(Debug, Clone)]
pub struct OpenIntIter<'a, C> {
    keys: &'a [i32],
    counts: &'a [C],
    used: &'a [bool],
    pos: usize,
    remaining: usize,
}

impl<'a, C: Copy> Iterator for OpenIntIter<'a, C> {
    type Item = (&'a i32, C);

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 && self.pos < self.used.len() {
            let pos = self.pos;
            self.pos += 1;
            if self.used[pos] {
                self.remaining -= 1;
                return Some((&self.keys[pos], self.counts[pos]));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<C: Copy> ExactSizeIterator for OpenIntIter<'_, C> {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Keys that all share home slot 0 in a table of `size` slots.
    fn colliding_keys(size: usize, n: usize) -> Vec<i32> {
        let mask = size - 1;
        (i32::MIN..)
            .step_by(7919)
            .filter(|&k| mix(k) & mask == 0)
            .take(n)
            .collect()
    }

    #[test]
    fn open_int_basic_flow() {
        let mut store: OpenIntStore<i32> = OpenIntStore::new();
        assert!(store.is_empty());
        assert_eq!(store.insert(5, 1), None);
        assert_eq!(store.insert(-5, 2), None);
        assert_eq!(store.insert(5, 3), Some(1));
        assert_eq!(store.get(&5), Some(3));
        assert_eq!(store.get(&-5), Some(2));
        assert_eq!(store.get(&6), None);
        assert_eq!(store.len(), 2);

        assert_eq!(store.remove(&5), Some(3));
        assert_eq!(store.remove(&5), None);
        assert_eq!(store.len(), 1);
        store.check_structure().unwrap();
    }

    #[test]
    fn open_int_handles_extreme_keys() {
        let mut store: OpenIntStore<i64> = OpenIntStore::new();
        store.insert(i32::MIN, 1);
        store.insert(i32::MAX, 2);
        store.insert(0, 3);
        assert_eq!(store.get(&i32::MIN), Some(1));
        assert_eq!(store.get(&i32::MAX), Some(2));
        assert_eq!(store.get(&0), Some(3));
        store.check_structure().unwrap();
    }

    #[test]
    fn open_int_grows_and_keeps_entries() {
        let mut store: OpenIntStore<i32> = StoreFactory::with_capacity(2);
        let initial = store.capacity();
        for key in 0..1000 {
            store.insert(key, key + 1);
        }
        assert!(store.capacity() > initial);
        assert!(store.capacity().is_power_of_two());
        assert_eq!(store.len(), 1000);
        for key in 0..1000 {
            assert_eq!(store.get(&key), Some(key + 1));
        }
        store.check_structure().unwrap();
    }

    #[test]
    fn open_int_remove_shifts_colliding_run() {
        let mut store: OpenIntStore<i32> = StoreFactory::with_capacity(32);
        let size = store.capacity();
        let keys = colliding_keys(size, 5);
        for (i, &key) in keys.iter().enumerate() {
            store.insert(key, i as i32 + 1);
        }
        assert_eq!(store.capacity(), size);

        // Removing the head of the run must keep the rest reachable.
        assert_eq!(store.remove(&keys[0]), Some(1));
        store.check_structure().unwrap();
        for (i, &key) in keys.iter().enumerate().skip(1) {
            assert_eq!(store.get(&key), Some(i as i32 + 1));
        }

        assert_eq!(store.remove(&keys[2]), Some(3));
        store.check_structure().unwrap();
        assert_eq!(store.get(&keys[4]), Some(5));
    }

    #[test]
    fn open_int_remove_across_table_wraparound() {
        let mut store: OpenIntStore<i32> = StoreFactory::with_capacity(8);
        let size = store.capacity();
        let mask = size - 1;
        let tail_keys: Vec<i32> = (0..)
            .filter(|&k| mix(k) & mask == mask)
            .take(3)
            .collect();
        for &key in &tail_keys {
            store.insert(key, 1);
        }
        store.check_structure().unwrap();
        store.remove(&tail_keys[0]);
        store.check_structure().unwrap();
        assert!(store.contains(&tail_keys[1]));
        assert!(store.contains(&tail_keys[2]));
    }

    #[test]
    fn open_int_iter_matches_len() {
        let mut store: OpenIntStore<i32> = OpenIntStore::new();
        for key in (0..200).step_by(3) {
            store.insert(key, 2);
        }
        store.remove(&0);
        let iter = store.iter();
        assert_eq!(iter.len(), store.len());
        assert_eq!(store.iter().count(), store.len());
        assert_eq!(store.keys().count(), store.len());
        let total: i32 = store.iter().map(|(_, c)| c).sum();
        assert_eq!(total as usize, store.len() * 2);
    }

    #[test]
    fn open_int_clear_keeps_allocation() {
        let mut store: OpenIntStore<i32> = OpenIntStore::new();
        for key in 0..100 {
            store.insert(key, 1);
        }
        let capacity = store.capacity();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.capacity(), capacity);
        assert_eq!(store.iter().next(), None);
        assert_eq!(store.get(&5), None);
        store.check_structure().unwrap();
    }

    #[test]
    fn open_int_rejects_unaddressable_table() {
        assert!(OpenIntStore::<i32>::try_with_capacity_and_load_factor(usize::MAX, 0.75).is_err());
        assert!(OpenIntStore::<i64>::try_with_capacity_and_load_factor(1 << 61, 0.5).is_err());
        let err = OpenIntStore::<i32>::try_with_capacity_and_load_factor(1_000, 1e-30).unwrap_err();
        assert!(err.message().contains("capacity 1000"));
    }

    #[test]
    fn open_int_load_factor_validation() {
        assert!(OpenIntStore::<i32>::try_with_capacity_and_load_factor(10, 0.0).is_err());
        assert!(OpenIntStore::<i32>::try_with_capacity_and_load_factor(10, f32::NAN).is_err());
        let store = OpenIntStore::<i32>::try_with_capacity_and_load_factor(10, 0.5).unwrap();
        assert_eq!(store.load_factor(), 0.5);
        assert!(store.capacity() >= 20);
    }

    #[test]
    fn table_size_is_power_of_two() {
        assert_eq!(table_size(0, 0.75), MIN_TABLE_SIZE);
        assert_eq!(table_size(12, 0.75), 16);
        assert_eq!(table_size(13, 0.75), 32);
        assert!(max_fill(2, 0.99) < 2);
    }
}
