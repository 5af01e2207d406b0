//! Sorted export of distribution entries.
//!
//! Two total orders are supported, both shared by every store:
//!
//! | Order     | Primary           | Tie-break      |
//! |-----------|-------------------|----------------|
//! | Frequency | count, descending | key, ascending |
//! | Key       | key, ascending    | -              |
//!
//! Entries are collected as borrowed `(&K, C)` pairs; keys are cloned only
//! for the events that end up in the result. A limited export first
//! partitions the `n` leading events with a selection step and then sorts
//! only that prefix, so its result is always the length-`n` prefix of the
//! full export.
//!
//! Key uniqueness is a store invariant. After sorting, a single linear scan
//! over adjacent pairs confirms it; two neighbours that compare equal under
//! a total order can only be the same event stored twice. A limited export
//! only scans the `n` events it returns, so a duplicate that falls outside
//! that prefix goes unreported; use a full export or
//! [`check_invariants`](crate::distribution::Distribution::check_invariants)
//! to verify the whole store.

use std::cmp::Ordering;

use tracing::error;

use crate::error::{DistributionError, Result};
use crate::traits::Count;

/// An owned `(event, count)` pair produced by sorted export.
///
/// Also used by reference form (`SortedEvent<&K, C>`) as the carrier slot of
/// [`EventCursor`](crate::iter::EventCursor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SortedEvent<K, C> {
    /// The observed event.
    pub key: K,
    /// Number of observations.
    pub count: C,
}

impl<K, C> SortedEvent<K, C> {
    /// Creates a new event.
    #[inline]
    pub fn new(key: K, count: C) -> Self {
        Self { key, count }
    }

    /// Splits the event into its `(key, count)` pair.
    #[inline]
    pub fn into_pair(self) -> (K, C) {
        (self.key, self.count)
    }
}

impl<K: Clone, C: Copy> SortedEvent<&K, C> {
    /// Copies a borrowed event into an owned one.
    #[inline]
    pub fn to_owned_event(&self) -> SortedEvent<K, C> {
        SortedEvent::new(self.key.clone(), self.count)
    }
}

impl<K, C> From<(K, C)> for SortedEvent<K, C> {
    fn from((key, count): (K, C)) -> Self {
        Self::new(key, count)
    }
}

/// Which total order an export uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Count descending, key ascending.
    Frequency,
    /// Key ascending.
    Key,
}

impl SortOrder {
    #[inline]
    fn compare<K: Ord, C: Count>(self, a: &(&K, C), b: &(&K, C)) -> Ordering {
        match self {
            SortOrder::Frequency => b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)),
            SortOrder::Key => a.0.cmp(b.0),
        }
    }
}

/// Sorts `entries` by `order`, keeping the first `limit` events if given.
///
/// Fails with [`DistributionError::IndexOutOfRange`] when `limit` exceeds
/// the number of entries, and with
/// [`DistributionError::CorruptedDistribution`] when an event appears twice.
pub(crate) fn export<'a, K, C, I>(
    entries: I,
    order: SortOrder,
    limit: Option<usize>,
) -> Result<Vec<SortedEvent<K, C>>>
where
    K: Ord + Clone + 'a,
    C: Count,
    I: Iterator<Item = (&'a K, C)>,
{
    let mut entries: Vec<(&K, C)> = entries.collect();
    let len = entries.len();
    let take = match limit {
        Some(n) if n > len => {
            return Err(DistributionError::IndexOutOfRange { requested: n, len });
        },
        Some(n) => n,
        None => len,
    };

    if take == 0 {
        return Ok(Vec::new());
    }
    if take < len {
        entries.select_nth_unstable_by(take - 1, |a, b| order.compare(a, b));
        entries.truncate(take);
    }
    entries.sort_unstable_by(|a, b| order.compare(a, b));
    ensure_distinct(&entries, order)?;

    Ok(entries
        .into_iter()
        .map(|(key, count)| SortedEvent::new(key.clone(), count))
        .collect())
}

fn ensure_distinct<K: Ord, C: Count>(entries: &[(&K, C)], order: SortOrder) -> Result<()> {
    let duplicates = entries
        .windows(2)
        .filter(|pair| order.compare(&pair[0], &pair[1]) == Ordering::Equal)
        .count();
    if duplicates == 0 {
        return Ok(());
    }
    error!(
        duplicates,
        ?order,
        "event observed twice during sorted export"
    );
    Err(DistributionError::corrupted(format!(
        "event observed twice ({duplicates} duplicate pair(s) under {order:?} order)"
    )))
}
