//! Conditional frequency distribution over integer events.
//!
//! Tracks `count(event | condition)` for `i32` events and conditions, along
//! with the marginal count of every event across all conditions.
//!
//! ## Architecture
//!
//! ```text
//!   conditionals: FxHashMap<cond, IntDistribution>
//!   ┌──────┬──────────────────────┐
//!   │ cond │ event → count        │
//!   ├──────┼──────────────────────┤
//!   │  1   │ 7 → 2   9 → 1        │
//!   │  2   │ 7 → 4                │
//!   └──────┴──────────────────────┘
//!
//!   marginals: IntDistribution       7 → 6   9 → 1
//!   sum_of_all_frequencies           = marginals.sum = 7
//! ```
//!
//! The marginal distribution doubles as the running total: its sum of
//! frequencies is the sum over every `(event, condition)` cell. Marginal
//! entries are dropped once they reach zero; conditional cells follow the
//! [`FrequencyDistribution::set`] rule and stay present at zero.
//!
//! ## Example Usage
//!
//! ```
//! use freqkit::prelude::*;
//!
//! let mut cfd = ConditionalDistribution::new();
//! cfd.increment(7, 1).unwrap();
//! cfd.increment_by(7, 2, 4).unwrap();
//! cfd.increment(9, 1).unwrap();
//!
//! assert_eq!(cfd.get(7, 2), 4);
//! assert_eq!(cfd.marginal_count(7), 5);
//! assert_eq!(cfd.sum_of_all_frequencies(), 6);
//! assert_eq!(cfd.conditional_distribution(1).map(|d| d.number_of_events()), Some(2));
//! assert!(cfd.check().is_ok());
//! ```

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::distribution::IntDistribution;
use crate::error::{DistributionError, Result};
use crate::traits::FrequencyDistribution;

/// Frequency of `i32` events conditioned on `i32` conditions.
#[derive(Debug, Clone, Default)]
pub struct ConditionalDistribution {
    conditionals: FxHashMap<i32, IntDistribution>,
    marginals: IntDistribution,
}

impl ConditionalDistribution {
    /// Creates an empty conditional distribution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the frequency of `event` conditioned on `cond`, returning the
    /// previous frequency (zero if absent).
    ///
    /// Fails with [`DistributionError::NegativeAmount`] for a negative count
    /// and with [`DistributionError::CountOverflow`] if the marginal count of
    /// `event` leaves `i32` or the overall sum leaves `i64`. State is
    /// unchanged on error.
    pub fn set(&mut self, event: i32, cond: i32, count: i32) -> Result<i32> {
        if count < 0 {
            return Err(DistributionError::NegativeAmount(i64::from(count)));
        }
        let previous = self.get(event, cond);
        let marginal = (self.marginals.get(&event) - previous)
            .checked_add(count)
            .ok_or(DistributionError::CountOverflow)?;
        (self.marginals.sum_of_frequencies() - i64::from(previous))
            .checked_add(i64::from(count))
            .ok_or(DistributionError::CountOverflow)?;

        // A conditional sum never exceeds the overall sum, so neither write
        // below can fail once the checks above pass.
        self.conditionals
            .entry(cond)
            .or_default()
            .set(event, count)?;
        if marginal == 0 {
            self.marginals.remove(&event);
        } else {
            self.marginals.set(event, marginal)?;
        }
        Ok(previous)
    }

    /// Adds one observation of `event` under `cond`.
    #[inline]
    pub fn increment(&mut self, event: i32, cond: i32) -> Result<()> {
        self.increment_by(event, cond, 1)
    }

    /// Adds `amount` observations of `event` under `cond`.
    pub fn increment_by(&mut self, event: i32, cond: i32, amount: i32) -> Result<()> {
        if amount < 0 {
            return Err(DistributionError::NegativeAmount(i64::from(amount)));
        }
        let count = self
            .get(event, cond)
            .checked_add(amount)
            .ok_or(DistributionError::CountOverflow)?;
        self.set(event, cond, count).map(|_| ())
    }

    /// Frequency of `event` under `cond`, zero if never observed.
    pub fn get(&self, event: i32, cond: i32) -> i32 {
        self.conditionals
            .get(&cond)
            .map_or(0, |dist| dist.get(&event))
    }

    /// Sum of the counts of `event` over every condition.
    #[inline]
    pub fn marginal_count(&self, event: i32) -> i32 {
        self.marginals.get(&event)
    }

    /// The distribution of events conditioned on `cond`, if any event was
    /// ever recorded under it.
    pub fn conditional_distribution(&self, cond: i32) -> Option<&IntDistribution> {
        self.conditionals.get(&cond)
    }

    /// The marginal distribution of events over all conditions.
    pub fn marginal_distribution(&self) -> &IntDistribution {
        &self.marginals
    }

    /// Sum of every `(event, condition)` frequency.
    #[inline]
    pub fn sum_of_all_frequencies(&self) -> i64 {
        self.marginals.sum_of_frequencies()
    }

    /// Number of distinct conditions recorded.
    pub fn number_of_conditions(&self) -> usize {
        self.conditionals.len()
    }

    /// Iterate recorded conditions in unspecified order.
    pub fn conditions(&self) -> impl Iterator<Item = i32> + '_ {
        self.conditionals.keys().copied()
    }

    /// Removes every condition and event.
    pub fn clear(&mut self) {
        debug!(
            conditions = self.conditionals.len(),
            sum_of_all_frequencies = self.sum_of_all_frequencies(),
            "clearing conditional distribution"
        );
        self.conditionals.clear();
        self.marginals.clear();
    }

    /// Internal consistency check.
    ///
    /// Recomputes every marginal count and the overall sum from the
    /// conditional distributions. Fails with
    /// [`DistributionError::CorruptedDistribution`] on any mismatch.
    pub fn check(&self) -> Result<()> {
        let result = self.check_inner();
        if let Err(err) = &result {
            warn!(%err, "conditional distribution failed consistency check");
        }
        result
    }

    fn check_inner(&self) -> Result<()> {
        self.marginals.check_invariants()?;

        let mut expected: FxHashMap<i32, i64> = FxHashMap::default();
        let mut total: i64 = 0;
        for (cond, dist) in &self.conditionals {
            dist.check_invariants().map_err(|err| {
                DistributionError::corrupted(format!("condition {cond}: {}", err.message()))
            })?;
            for (&event, count) in dist {
                *expected.entry(event).or_insert(0) += i64::from(count);
            }
            total += dist.sum_of_frequencies();
        }

        for (&event, &count) in &expected {
            let marginal = i64::from(self.marginals.get(&event));
            if marginal != count {
                return Err(DistributionError::corrupted(format!(
                    "marginal count of {event} is {marginal}, conditionals sum to {count}"
                )));
            }
        }
        for (&event, count) in &self.marginals {
            if !expected.contains_key(&event) {
                return Err(DistributionError::corrupted(format!(
                    "marginal count of {event} is {count} but no condition records it"
                )));
            }
        }
        if total != self.sum_of_all_frequencies() {
            return Err(DistributionError::corrupted(format!(
                "sum of all frequencies is {}, conditionals sum to {total}",
                self.sum_of_all_frequencies()
            )));
        }
        Ok(())
    }
}
