//! Flyweight traversal over distribution entries.
//!
//! Two ways to walk the raw `(event, count)` pairs of a distribution, both in
//! unspecified backing-store order:
//!
//! - [`FrequencyDistribution::iter`](crate::traits::FrequencyDistribution::iter)
//!   is a plain [`Iterator`] over `(&K, C)`. Nothing is allocated; each item
//!   is an independent value.
//! - [`EventCursor`] reuses a single [`SortedEvent`] slot across advances.
//!   The event returned by [`advance`](EventCursor::advance) is only valid
//!   until the next call, which the borrow checker enforces: the returned
//!   reference borrows the cursor mutably. Copy it with
//!   [`SortedEvent::to_owned_event`] to retain it.
//!
//! Both borrow the distribution, so it cannot be mutated mid-traversal.
//! Each call to `iter()`/`cursor()` starts a fresh, independent traversal.
//!
//! ## Example
//!
//! ```
//! use freqkit::prelude::*;
//!
//! let mut dist = IntDistribution::new();
//! for event in [3, 1, 3, 2, 3] {
//!     dist.increment(event).unwrap();
//! }
//!
//! let mut cursor = dist.cursor();
//! let mut total = 0i64;
//! while let Some(event) = cursor.advance() {
//!     total += i64::from(event.count);
//! }
//! assert_eq!(total, dist.sum_of_frequencies());
//! assert!(cursor.remove().is_err());
//! ```

use crate::error::{DistributionError, Result};
use crate::sorted::SortedEvent;

/// Reusable-slot cursor over `(event, count)` pairs.
#[derive(Debug)]
pub struct EventCursor<'a, K, C, I> {
    inner: I,
    slot: Option<SortedEvent<&'a K, C>>,
}

impl<'a, K, C, I> EventCursor<'a, K, C, I>
where
    C: Copy,
    I: Iterator<Item = (&'a K, C)>,
{
    pub(crate) fn new(inner: I) -> Self {
        Self {
            inner,
            slot: None,
        }
    }

    /// Moves to the next entry and returns it.
    ///
    /// The returned event is overwritten by the following call. Returns
    /// `None` once the traversal is exhausted, and on every call after that.
    pub fn advance(&mut self) -> Option<&SortedEvent<&'a K, C>> {
        match self.inner.next() {
            Some((key, count)) => {
                match self.slot.as_mut() {
                    Some(event) => {
                        event.key = key;
                        event.count = count;
                    },
                    None => self.slot = Some(SortedEvent::new(key, count)),
                }
                self.slot.as_ref()
            },
            None => {
                self.slot = None;
                None
            },
        }
    }

    /// The entry returned by the last [`advance`](Self::advance), if any.
    pub fn current(&self) -> Option<&SortedEvent<&'a K, C>> {
        self.slot.as_ref()
    }

    /// Number of entries not yet visited, when the backing store knows it.
    pub fn remaining(&self) -> Option<usize> {
        match self.inner.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }

    /// Removal through a cursor is not supported; mutate the distribution
    /// once the traversal is done.
    pub fn remove(&mut self) -> Result<()> {
        Err(DistributionError::OperationNotSupported(
            "remove through an event cursor",
        ))
    }
}
