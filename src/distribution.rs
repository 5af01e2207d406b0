//! Frequency distribution over a pluggable count store.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────────────────────────┐
//!   │                 Distribution<K, C, S>                       │
//!   │                                                             │
//!   │   counts: S: CountStore<K, C>      sum_of_frequencies: i64  │
//!   │   ┌────────────┬────────┐                                   │
//!   │   │    key     │ count  │          invariant:               │
//!   │   ├────────────┼────────┤          sum == Σ counts          │
//!   │   │  "apple"   │   3    │                                   │
//!   │   │  "banana"  │   5    │          = 8                      │
//!   │   └────────────┴────────┘                                   │
//!   └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation validates first and writes second: amounts, overflow and
//! presence are checked before the store or the running sum is touched, so a
//! returned error always leaves the distribution as it was.
//!
//! ## Variants
//!
//! | Alias                   | Key | Count | Store                |
//! |-------------------------|-----|-------|----------------------|
//! | [`KeyedDistribution`]   | `K` | `i32` | [`HashMapStore`]     |
//! | [`IntDistribution`]     | i32 | `i32` | [`OpenIntStore`]     |
//! | [`WideIntDistribution`] | i32 | `i64` | [`OpenIntStore`]     |
//!
//! ## Example Usage
//!
//! ```
//! use freqkit::prelude::*;
//!
//! let mut terms: KeyedDistribution<&str> = KeyedDistribution::new();
//! for term in ["a", "b", "c", "b", "c", "a", "b", "c", "b", "c", "a", "b", "c"] {
//!     terms.increment(term).unwrap();
//! }
//!
//! let top: Vec<_> = terms
//!     .frequency_sorted_events_limited(2)
//!     .unwrap()
//!     .into_iter()
//!     .map(SortedEvent::into_pair)
//!     .collect();
//! assert_eq!(top, vec![("b", 5), ("c", 5)]);
//! assert_eq!(terms.sum_of_frequencies(), 13);
//! ```

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use tracing::{debug, warn};

use crate::error::{DistributionError, InvariantError, Result};
use crate::sorted::{self, SortOrder, SortedEvent};
use crate::store::hashmap::HashMapStore;
use crate::store::open_int::OpenIntStore;
use crate::store::traits::{CountStore, StoreFactory};
use crate::traits::{Count, FrequencyDistribution};

/// Distribution over arbitrary ordered keys with 32-bit counts.
pub type KeyedDistribution<K> = Distribution<K, i32, HashMapStore<K, i32>>;

/// Distribution over `i32` events with 32-bit counts.
pub type IntDistribution = Distribution<i32, i32, OpenIntStore<i32>>;

/// Distribution over `i32` events with 64-bit counts.
pub type WideIntDistribution = Distribution<i32, i64, OpenIntStore<i64>>;

/// A mutable table of event counts with a maintained sum of frequencies.
pub struct Distribution<K, C, S> {
    counts: S,
    sum_of_frequencies: i64,
    _marker: PhantomData<fn() -> (K, C)>,
}

impl<K, C, S> Distribution<K, C, S>
where
    C: Count,
    S: CountStore<K, C>,
{
    /// Builds a distribution from a store that may already hold counts.
    ///
    /// Fails with [`DistributionError::NegativeAmount`] if any stored count is
    /// negative and with [`DistributionError::CountOverflow`] if the counts do
    /// not sum within `i64`.
    ///
    /// # Example
    ///
    /// ```
    /// use freqkit::prelude::*;
    /// use freqkit::store::open_int::OpenIntStore;
    /// use freqkit::store::traits::CountStore;
    ///
    /// let mut store: OpenIntStore<i64> = OpenIntStore::new();
    /// store.insert(1, 10);
    /// store.insert(2, 32);
    ///
    /// let dist = WideIntDistribution::try_from_store(store).unwrap();
    /// assert_eq!(dist.sum_of_frequencies(), 42);
    /// ```
    pub fn try_from_store(store: S) -> Result<Self> {
        let mut sum: i64 = 0;
        for (_, count) in store.iter() {
            if count.is_negative() {
                return Err(DistributionError::NegativeAmount(count.to_i64()));
            }
            sum = sum
                .checked_add(count.to_i64())
                .ok_or(DistributionError::CountOverflow)?;
        }
        Ok(Self {
            counts: store,
            sum_of_frequencies: sum,
            _marker: PhantomData,
        })
    }

    pub(crate) fn from_empty_store(store: S) -> Self {
        debug_assert!(store.is_empty());
        Self {
            counts: store,
            sum_of_frequencies: 0,
            _marker: PhantomData,
        }
    }

    /// Creates an empty distribution sized for roughly `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self
    where
        S: StoreFactory,
    {
        Self::from_empty_store(S::with_capacity(capacity))
    }

    /// Creates an empty distribution.
    pub fn new() -> Self
    where
        S: Default,
    {
        Self::from_empty_store(S::default())
    }

    /// Read-only access to the backing store.
    pub fn store(&self) -> &S {
        &self.counts
    }

    /// Iterate observed events in backing-store order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.counts.iter().map(|(key, _)| key)
    }

    /// Iterate counts in backing-store order.
    pub fn values(&self) -> impl Iterator<Item = C> + '_ {
        self.counts.iter().map(|(_, count)| count)
    }

    /// Recomputes the sum of frequencies and validates the store.
    ///
    /// # Example
    ///
    /// ```
    /// use freqkit::prelude::*;
    ///
    /// let mut dist = WideIntDistribution::new();
    /// dist.increment_by(7, 1 << 40).unwrap();
    /// assert!(dist.check_invariants().is_ok());
    /// ```
    pub fn check_invariants(&self) -> std::result::Result<(), InvariantError> {
        self.counts.check_structure()?;

        let mut total: i64 = 0;
        let mut visited = 0usize;
        for (_, count) in self.counts.iter() {
            if count.is_negative() {
                return Err(InvariantError::new(format!("negative count {count}")));
            }
            total = total
                .checked_add(count.to_i64())
                .ok_or_else(|| InvariantError::new("sum of counts overflows i64"))?;
            visited += 1;
        }
        if visited != self.counts.len() {
            return Err(InvariantError::new(format!(
                "store reports {} events but yields {}",
                self.counts.len(),
                visited
            )));
        }
        if total != self.sum_of_frequencies {
            return Err(InvariantError::new(format!(
                "sum of frequencies {} differs from sum of counts {}",
                self.sum_of_frequencies, total
            )));
        }
        Ok(())
    }

    fn checked_sum_add(&self, amount: C) -> Result<i64> {
        self.sum_of_frequencies
            .checked_add(amount.to_i64())
            .ok_or(DistributionError::CountOverflow)
    }
}

impl<K, C, S> Default for Distribution<K, C, S>
where
    C: Count,
    S: CountStore<K, C> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C, S: Clone> Clone for Distribution<K, C, S> {
    fn clone(&self) -> Self {
        Self {
            counts: self.counts.clone(),
            sum_of_frequencies: self.sum_of_frequencies,
            _marker: PhantomData,
        }
    }
}

impl<K, C, S> fmt::Debug for Distribution<K, C, S>
where
    C: Count,
    S: CountStore<K, C>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Distribution")
            .field("events", &self.counts.len())
            .field("sum_of_frequencies", &self.sum_of_frequencies)
            .finish()
    }
}

impl<K, C, S> FrequencyDistribution for Distribution<K, C, S>
where
    K: Ord + Clone,
    C: Count,
    S: CountStore<K, C>,
{
    type Key = K;
    type Count = C;
    type Iter<'a>
        = S::Iter<'a>
    where
        Self: 'a;

    fn increment_by(&mut self, key: K, amount: C) -> Result<()> {
        if amount.is_negative() {
            return Err(DistributionError::NegativeAmount(amount.to_i64()));
        }
        let sum = self.checked_sum_add(amount)?;
        match self.counts.get_mut(&key) {
            Some(count) => {
                *count = count
                    .checked_add(amount)
                    .ok_or(DistributionError::CountOverflow)?;
            },
            None => {
                self.counts.insert(key, amount);
            },
        }
        self.sum_of_frequencies = sum;
        Ok(())
    }

    fn decrement_by(&mut self, key: &K, amount: C) -> Result<()> {
        if amount.is_negative() {
            return Err(DistributionError::NegativeAmount(amount.to_i64()));
        }
        let current = self
            .counts
            .get(key)
            .ok_or(DistributionError::NoSuchEvent)?;
        if current < amount {
            return Err(DistributionError::DecrementBelowZero {
                requested: amount.to_i64(),
                available: current.to_i64(),
            });
        }
        if current == amount {
            self.counts.remove(key);
        } else if let Some(count) = self.counts.get_mut(key) {
            // amount <= current, both non-negative
            *count = current
                .checked_sub(amount)
                .ok_or(DistributionError::CountOverflow)?;
        }
        self.sum_of_frequencies -= amount.to_i64();
        Ok(())
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.counts.contains(key)
    }

    #[inline]
    fn get(&self, key: &K) -> C {
        self.counts.get(key).unwrap_or(C::ZERO)
    }

    fn set(&mut self, key: K, count: C) -> Result<C> {
        if count.is_negative() {
            return Err(DistributionError::NegativeAmount(count.to_i64()));
        }
        let previous = self.get(&key);
        let sum = (self.sum_of_frequencies - previous.to_i64())
            .checked_add(count.to_i64())
            .ok_or(DistributionError::CountOverflow)?;
        self.counts.insert(key, count);
        self.sum_of_frequencies = sum;
        Ok(previous)
    }

    fn remove(&mut self, key: &K) -> C {
        match self.counts.remove(key) {
            Some(count) => {
                self.sum_of_frequencies -= count.to_i64();
                count
            },
            None => C::ZERO,
        }
    }

    fn clear(&mut self) {
        debug!(
            events = self.counts.len(),
            sum_of_frequencies = self.sum_of_frequencies,
            "clearing distribution"
        );
        self.counts.clear();
        self.sum_of_frequencies = 0;
    }

    #[inline]
    fn number_of_events(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    fn sum_of_frequencies(&self) -> i64 {
        self.sum_of_frequencies
    }

    fn frequency_sorted_events(&self) -> Result<Vec<SortedEvent<K, C>>> {
        sorted::export(self.counts.iter(), SortOrder::Frequency, None)
    }

    fn frequency_sorted_events_limited(&self, n: usize) -> Result<Vec<SortedEvent<K, C>>> {
        sorted::export(self.counts.iter(), SortOrder::Frequency, Some(n))
    }

    fn sorted_events(&self) -> Result<Vec<SortedEvent<K, C>>> {
        sorted::export(self.counts.iter(), SortOrder::Key, None)
    }

    fn sorted_events_limited(&self, n: usize) -> Result<Vec<SortedEvent<K, C>>> {
        sorted::export(self.counts.iter(), SortOrder::Key, Some(n))
    }

    fn iter(&self) -> S::Iter<'_> {
        self.counts.iter()
    }
}

impl<'a, K, C, S> IntoIterator for &'a Distribution<K, C, S>
where
    K: Ord + Clone + 'a,
    C: Count,
    S: CountStore<K, C> + 'a,
{
    type Item = (&'a K, C);
    type IntoIter = S::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}

impl<K, C, S> Extend<K> for Distribution<K, C, S>
where
    K: Ord + Clone,
    C: Count,
    S: CountStore<K, C>,
{
    /// Increments every event; stops at the first count that would overflow.
    fn extend<T: IntoIterator<Item = K>>(&mut self, events: T) {
        for event in events {
            if let Err(err) = self.increment(event) {
                warn!(%err, "extend stopped early");
                return;
            }
        }
    }
}

impl<K, C, S> FromIterator<K> for Distribution<K, C, S>
where
    K: Ord + Clone,
    C: Count,
    S: CountStore<K, C> + Default,
{
    /// Counts every event.
    ///
    /// Like [`Extend`], collection stops at the first increment that would
    /// overflow and logs a warning; the result then holds only the events
    /// seen before that point. Use
    /// [`increment`](FrequencyDistribution::increment) directly to observe
    /// the error.
    fn from_iter<T: IntoIterator<Item = K>>(events: T) -> Self {
        let mut dist = Self::new();
        dist.extend(events);
        dist
    }
}

impl<K, C> Distribution<K, C, HashMapStore<K, C>>
where
    K: Eq + Hash,
    C: Count,
{
    /// Capacity of the backing hash map.
    pub fn map_capacity(&self) -> usize {
        self.counts.map_capacity()
    }
}

impl<C: Count> Distribution<i32, C, OpenIntStore<C>> {
    /// Number of slots in the backing open-addressing table.
    pub fn table_capacity(&self) -> usize {
        self.counts.capacity()
    }

    /// Approximate heap bytes held by the backing table.
    pub fn approx_bytes(&self) -> usize {
        self.counts.approx_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_consistent<K, C, S>(dist: &Distribution<K, C, S>)
    where
        K: Ord + Clone,
        C: Count,
        S: CountStore<K, C>,
    {
        dist.check_invariants().unwrap();
        let total: i64 = dist.values().map(Count::to_i64).sum();
        assert_eq!(total, dist.sum_of_frequencies());
    }

    // ==============================================
    // Scenarios
    // ==============================================

    #[test]
    fn sorted_exports_order_ties_by_key() {
        let mut dist: KeyedDistribution<String> = KeyedDistribution::new();
        dist.set("A".to_string(), 3).unwrap();
        dist.set("B".to_string(), 5).unwrap();
        dist.set("C".to_string(), 5).unwrap();

        let by_freq: Vec<(String, i32)> = dist
            .frequency_sorted_events()
            .unwrap()
            .into_iter()
            .map(SortedEvent::into_pair)
            .collect();
        assert_eq!(
            by_freq,
            vec![
                ("B".to_string(), 5),
                ("C".to_string(), 5),
                ("A".to_string(), 3)
            ]
        );

        let by_key: Vec<(String, i32)> = dist
            .sorted_events()
            .unwrap()
            .into_iter()
            .map(SortedEvent::into_pair)
            .collect();
        assert_eq!(
            by_key,
            vec![
                ("A".to_string(), 3),
                ("B".to_string(), 5),
                ("C".to_string(), 5)
            ]
        );
    }

    #[test]
    fn increment_then_decrement_to_zero_removes() {
        let mut dist: KeyedDistribution<&str> = KeyedDistribution::new();
        for _ in 0..3 {
            dist.increment("x").unwrap();
        }
        assert_eq!(dist.get(&"x"), 3);
        assert_eq!(dist.number_of_events(), 1);
        assert_eq!(dist.sum_of_frequencies(), 3);

        dist.decrement_by(&"x", 3).unwrap();
        assert!(!dist.contains(&"x"));
        assert_eq!(dist.sum_of_frequencies(), 0);
        assert_consistent(&dist);
    }

    #[test]
    fn set_zero_keeps_event_present() {
        let mut dist: KeyedDistribution<&str> = KeyedDistribution::new();
        assert_eq!(dist.set("x", 0).unwrap(), 0);
        assert!(dist.contains(&"x"));
        assert_eq!(dist.get(&"x"), 0);
        assert_eq!(dist.number_of_events(), 1);
        assert_eq!(dist.sum_of_frequencies(), 0);
        assert_consistent(&dist);
    }

    #[test]
    fn limited_export_beyond_len_is_out_of_range() {
        let mut dist = IntDistribution::new();
        dist.increment(1).unwrap();
        dist.increment(2).unwrap();
        assert_eq!(
            dist.frequency_sorted_events_limited(3),
            Err(DistributionError::IndexOutOfRange {
                requested: 3,
                len: 2
            })
        );
        assert_eq!(
            dist.sorted_events_limited(3),
            Err(DistributionError::IndexOutOfRange {
                requested: 3,
                len: 2
            })
        );
        assert_eq!(dist.sorted_events_limited(2).unwrap().len(), 2);
    }

    // ==============================================
    // Mutation contract
    // ==============================================

    #[test]
    fn increment_on_absent_matches_set() {
        let mut incremented = IntDistribution::new();
        let mut set = IntDistribution::new();
        incremented.increment_by(4, 9).unwrap();
        set.set(4, 9).unwrap();
        assert_eq!(incremented.get(&4), set.get(&4));
        assert_eq!(incremented.sum_of_frequencies(), set.sum_of_frequencies());
        assert_eq!(incremented.number_of_events(), set.number_of_events());
    }

    #[test]
    fn decrement_absent_is_no_such_event() {
        let mut dist = WideIntDistribution::new();
        assert_eq!(dist.decrement(&1), Err(DistributionError::NoSuchEvent));
        assert_eq!(dist.decrement_by(&1, 5), Err(DistributionError::NoSuchEvent));
        assert!(dist.is_empty());
    }

    #[test]
    fn decrement_below_zero_leaves_state_untouched() {
        let mut dist = IntDistribution::new();
        dist.increment_by(7, 2).unwrap();
        assert_eq!(
            dist.decrement_by(&7, 3),
            Err(DistributionError::DecrementBelowZero {
                requested: 3,
                available: 2
            })
        );
        assert_eq!(dist.get(&7), 2);
        assert_eq!(dist.sum_of_frequencies(), 2);
        assert_consistent(&dist);
    }

    #[test]
    fn decrement_reduces_in_place() {
        let mut dist = IntDistribution::new();
        dist.increment_by(7, 5).unwrap();
        dist.decrement(&7).unwrap();
        dist.decrement_by(&7, 2).unwrap();
        assert_eq!(dist.get(&7), 2);
        assert_eq!(dist.sum_of_frequencies(), 2);
        assert!(dist.contains(&7));
    }

    #[test]
    fn decrement_event_stored_with_zero_count() {
        let mut dist = IntDistribution::new();
        dist.set(3, 0).unwrap();
        dist.decrement_by(&3, 0).unwrap();
        assert!(!dist.contains(&3));
        assert_eq!(
            dist.decrement(&3),
            Err(DistributionError::NoSuchEvent)
        );
    }

    #[test]
    fn set_returns_previous_and_adjusts_sum() {
        let mut dist = IntDistribution::new();
        assert_eq!(dist.set(1, 10).unwrap(), 0);
        assert_eq!(dist.set(1, 4).unwrap(), 10);
        dist.increment_by(2, 6).unwrap();
        assert_eq!(dist.sum_of_frequencies(), 10);
        assert_consistent(&dist);
    }

    #[test]
    fn remove_reports_zero_for_absent() {
        let mut dist = IntDistribution::new();
        dist.increment_by(1, 3).unwrap();
        assert_eq!(dist.remove(&2), 0);
        assert_eq!(dist.remove(&1), 3);
        assert_eq!(dist.remove(&1), 0);
        assert_eq!(dist.sum_of_frequencies(), 0);
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let mut dist = IntDistribution::new();
        dist.increment_by(1, 3).unwrap();
        assert_eq!(
            dist.increment_by(1, -1),
            Err(DistributionError::NegativeAmount(-1))
        );
        assert_eq!(
            dist.decrement_by(&1, -1),
            Err(DistributionError::NegativeAmount(-1))
        );
        assert_eq!(dist.set(1, -4), Err(DistributionError::NegativeAmount(-4)));
        assert_eq!(dist.get(&1), 3);
        assert_consistent(&dist);
    }

    #[test]
    fn narrow_count_overflow_is_rejected() {
        let mut dist = IntDistribution::new();
        dist.set(1, i32::MAX).unwrap();
        assert_eq!(dist.increment(1), Err(DistributionError::CountOverflow));
        assert_eq!(dist.get(&1), i32::MAX);
        assert_eq!(dist.sum_of_frequencies(), i64::from(i32::MAX));

        // The aggregate is 64-bit, so other events still fit.
        dist.set(2, i32::MAX).unwrap();
        assert_eq!(dist.sum_of_frequencies(), 2 * i64::from(i32::MAX));
        assert_consistent(&dist);
    }

    #[test]
    fn wide_counts_exceed_narrow_range() {
        let mut dist = WideIntDistribution::new();
        dist.increment_by(1, i64::from(i32::MAX)).unwrap();
        dist.increment_by(1, 10).unwrap();
        assert_eq!(dist.get(&1), i64::from(i32::MAX) + 10);

        dist.set(2, i64::MAX - dist.sum_of_frequencies()).unwrap();
        assert_eq!(dist.sum_of_frequencies(), i64::MAX);
        assert_eq!(dist.increment(3), Err(DistributionError::CountOverflow));
        assert!(!dist.contains(&3));
        assert_consistent(&dist);
    }

    #[test]
    fn clear_resets_everything() {
        let mut dist: KeyedDistribution<u64> = (0..100u64).collect();
        assert_eq!(dist.number_of_events(), 100);
        dist.clear();
        assert!(dist.is_empty());
        assert_eq!(dist.sum_of_frequencies(), 0);
        assert!(dist.frequency_sorted_events().unwrap().is_empty());
        assert_consistent(&dist);
    }

    // ==============================================
    // Iteration and accessors
    // ==============================================

    #[test]
    fn iteration_visits_each_event_once() {
        let dist: IntDistribution = [5, 1, 5, 3, 5, 1].into_iter().collect();
        assert_eq!(dist.iter().count(), dist.number_of_events());
        let total: i64 = (&dist).into_iter().map(|(_, c)| i64::from(c)).sum();
        assert_eq!(total, dist.sum_of_frequencies());

        let mut keys: Vec<i32> = dist.keys().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![1, 3, 5]);
        assert_eq!(dist.values().map(i64::from).sum::<i64>(), 6);
    }

    #[test]
    fn extend_stops_at_first_overflow() {
        let mut dist = IntDistribution::new();
        dist.set(1, i32::MAX).unwrap();
        dist.extend([2, 1, 3]);

        assert_eq!(dist.get(&2), 1);
        assert_eq!(dist.get(&1), i32::MAX);
        assert!(!dist.contains(&3));
        assert_eq!(dist.sum_of_frequencies(), i64::from(i32::MAX) + 1);
        assert_consistent(&dist);
    }

    #[test]
    fn fresh_cursor_restarts_traversal() {
        let dist: IntDistribution = (0..10).collect();
        let mut exhausted = dist.cursor();
        while exhausted.advance().is_some() {}

        let mut cursor = dist.cursor();
        let mut seen = 0;
        while cursor.advance().is_some() {
            seen += 1;
        }
        assert_eq!(seen, 10);
    }

    #[test]
    fn keyed_distribution_reports_map_capacity() {
        let dist: KeyedDistribution<String> = KeyedDistribution::with_capacity(128);
        assert!(dist.map_capacity() >= 128);
        assert!(format!("{dist:?}").contains("events: 0"));
    }
}
