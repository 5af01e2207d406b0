//! # Distribution Trait Hierarchy
//!
//! Defines the counter abstraction and the operation set every frequency
//! distribution supports, independent of how counts are stored.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                 FrequencyDistribution                            │
//!   │                                                                  │
//!   │  Mutation                      Query                             │
//!   │  ────────                      ─────                             │
//!   │  increment(K)                  contains(&K) → bool               │
//!   │  increment_by(K, C)            get(&K) → C   (zero if absent)    │
//!   │  decrement(&K)                 number_of_events() → usize        │
//!   │  decrement_by(&K, C)           sum_of_frequencies() → i64        │
//!   │  set(K, C) → C                                                   │
//!   │  remove(&K) → C                Sorted export                     │
//!   │  clear()                       ─────────────                     │
//!   │                                frequency_sorted_events[_limited] │
//!   │  Iteration                     sorted_events[_limited]           │
//!   │  ─────────                                                       │
//!   │  iter() → (&K, C)*                                               │
//!   │  cursor() → EventCursor                                          │
//!   └──────────────────────────────────────────────────────────────────┘
//!                              ▲
//!                              │ implemented once by
//!                              │
//!              Distribution<K, C, S: CountStore<K, C>>
//!                              │
//!          ┌───────────────────┼─────────────────────┐
//!          ▼                   ▼                     ▼
//!   KeyedDistribution<K>  IntDistribution     WideIntDistribution
//!   (K, i32, FxHashMap)   (i32, i32, open)    (i32, i64, open)
//! ```
//!
//! ## Count Widths
//!
//! | Counter | Per-event range | Sum of frequencies |
//! |---------|-----------------|--------------------|
//! | `i32`   | `0..=i32::MAX`  | `i64`              |
//! | `i64`   | `0..=i64::MAX`  | `i64`              |
//!
//! Counts are never negative: every mutation rejects negative amounts with
//! [`DistributionError::NegativeAmount`](crate::error::DistributionError::NegativeAmount).

use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::error::Result;
use crate::iter::EventCursor;
use crate::sorted::SortedEvent;

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
}

/// Signed integer used as a per-event count.
///
/// Implemented for `i32` (narrow) and `i64` (wide) only.
pub trait Count:
    sealed::Sealed + Copy + Ord + Hash + Default + Debug + Display + Send + Sync + 'static
{
    /// The zero count, returned by `get` for absent events.
    const ZERO: Self;
    /// A single observation.
    const ONE: Self;

    /// Widens the count into the sum-of-frequencies domain.
    fn to_i64(self) -> i64;

    /// Adds two counts, returning `None` on overflow.
    fn checked_add(self, rhs: Self) -> Option<Self>;

    /// Subtracts two counts, returning `None` on overflow.
    fn checked_sub(self, rhs: Self) -> Option<Self>;

    /// Returns `true` if the count is below zero.
    #[inline]
    fn is_negative(self) -> bool {
        self < Self::ZERO
    }
}

macro_rules! impl_count {
    ($($t:ty),*) => {
        $(
            impl Count for $t {
                const ZERO: Self = 0;
                const ONE: Self = 1;

                #[inline]
                fn to_i64(self) -> i64 {
                    i64::from(self)
                }

                #[inline]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_add(self, rhs)
                }

                #[inline]
                fn checked_sub(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_sub(self, rhs)
                }
            }
        )*
    };
}

impl_count!(i32, i64);

/// Operations shared by every frequency distribution.
///
/// `increment`/`set` insert events; `decrement` removes an event once its
/// count reaches exactly zero, while `set(k, 0)` keeps `k` present with a
/// zero count. Use [`contains`](Self::contains) to tell an absent event from
/// one stored with count zero, since [`get`](Self::get) and
/// [`remove`](Self::remove) report both as zero.
///
/// # Example
///
/// ```
/// use freqkit::prelude::*;
///
/// fn observe<D: FrequencyDistribution<Key = i32>>(dist: &mut D, events: &[i32]) {
///     for &event in events {
///         dist.increment(event).unwrap();
///     }
/// }
///
/// let mut narrow = IntDistribution::new();
/// let mut wide = WideIntDistribution::new();
/// observe(&mut narrow, &[1, 2, 2]);
/// observe(&mut wide, &[1, 2, 2]);
/// assert_eq!(narrow.sum_of_frequencies(), wide.sum_of_frequencies());
/// ```
pub trait FrequencyDistribution {
    /// The event type being counted.
    type Key;
    /// The per-event counter width.
    type Count: Count;
    /// Borrowing iterator over `(event, count)` pairs in backing-store order.
    type Iter<'a>: Iterator<Item = (&'a Self::Key, Self::Count)>
    where
        Self: 'a;

    /// Increments the count of `key` by one.
    fn increment(&mut self, key: Self::Key) -> Result<()> {
        self.increment_by(key, <Self::Count as Count>::ONE)
    }

    /// Increments the count of `key` by `amount`; an absent key behaves as
    /// `set(key, amount)`.
    fn increment_by(&mut self, key: Self::Key, amount: Self::Count) -> Result<()>;

    /// Decrements the count of `key` by one.
    fn decrement(&mut self, key: &Self::Key) -> Result<()> {
        self.decrement_by(key, <Self::Count as Count>::ONE)
    }

    /// Decrements the count of `key` by `amount`, removing the event when the
    /// count reaches exactly zero.
    fn decrement_by(&mut self, key: &Self::Key, amount: Self::Count) -> Result<()>;

    /// Returns `true` if `key` has been observed.
    fn contains(&self, key: &Self::Key) -> bool;

    /// Returns the count of `key`, or zero if absent.
    fn get(&self, key: &Self::Key) -> Self::Count;

    /// Stores `count` for `key`, returning the previous count (zero if new).
    fn set(&mut self, key: Self::Key, count: Self::Count) -> Result<Self::Count>;

    /// Removes `key`, returning its count (zero if absent).
    fn remove(&mut self, key: &Self::Key) -> Self::Count;

    /// Removes every event and resets the sum of frequencies.
    fn clear(&mut self);

    /// Number of distinct events present.
    fn number_of_events(&self) -> usize;

    /// Sum of all counts.
    fn sum_of_frequencies(&self) -> i64;

    /// Returns `true` if no events are present.
    fn is_empty(&self) -> bool {
        self.number_of_events() == 0
    }

    /// All events, count descending, ties broken by key ascending.
    fn frequency_sorted_events(&self) -> Result<Vec<SortedEvent<Self::Key, Self::Count>>>;

    /// The first `n` events of [`frequency_sorted_events`](Self::frequency_sorted_events).
    fn frequency_sorted_events_limited(
        &self,
        n: usize,
    ) -> Result<Vec<SortedEvent<Self::Key, Self::Count>>>;

    /// All events, key ascending.
    fn sorted_events(&self) -> Result<Vec<SortedEvent<Self::Key, Self::Count>>>;

    /// The first `n` events of [`sorted_events`](Self::sorted_events).
    fn sorted_events_limited(&self, n: usize)
    -> Result<Vec<SortedEvent<Self::Key, Self::Count>>>;

    /// Iterates `(event, count)` pairs in unspecified backing-store order.
    fn iter(&self) -> Self::Iter<'_>;

    /// Starts a new flyweight traversal from the beginning of the store.
    fn cursor(&self) -> EventCursor<'_, Self::Key, Self::Count, Self::Iter<'_>> {
        EventCursor::new(self.iter())
    }
}
