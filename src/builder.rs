//! Builder for every distribution variant.
//!
//! Collects the sizing knobs shared by the stores (expected number of
//! distinct events and, for the open-addressing integer store, the load
//! factor) and produces a ready-to-use distribution.
//!
//! ## Example
//!
//! ```rust
//! use freqkit::builder::DistributionBuilder;
//! use freqkit::prelude::*;
//!
//! let mut terms = DistributionBuilder::new()
//!     .capacity(1_000)
//!     .build_keyed::<String>();
//! terms.increment("rust".to_string()).unwrap();
//!
//! let mut docs = DistributionBuilder::new()
//!     .capacity(1_000)
//!     .load_factor(0.5)
//!     .try_build_int()
//!     .unwrap();
//! docs.increment_by(42, 3).unwrap();
//! assert_eq!(docs.get(&42), 3);
//! ```

use std::hash::Hash;

use tracing::debug;

use crate::distribution::{Distribution, IntDistribution, KeyedDistribution, WideIntDistribution};
use crate::error::ConfigError;
use crate::store::hashmap::HashMapStore;
use crate::store::open_int::{
    DEFAULT_EXPECTED_ENTRIES, DEFAULT_LOAD_FACTOR, OpenIntStore, validate_load_factor,
};
use crate::store::traits::StoreFactory;
use crate::traits::Count;

/// Builder for creating distribution instances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionBuilder {
    capacity: usize,
    load_factor: f32,
}

impl Default for DistributionBuilder {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_EXPECTED_ENTRIES,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl DistributionBuilder {
    /// Create a builder with default sizing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expected number of distinct events.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Maximum fill ratio of the integer store before it doubles.
    ///
    /// Must lie in `(0, 1)`; checked by [`validate`](Self::validate) and the
    /// `try_build_*` methods. The hash-map store ignores it.
    pub fn load_factor(mut self, load_factor: f32) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Checks the configured parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_load_factor(self.load_factor)
    }

    /// Build a distribution over arbitrary ordered, hashable events.
    ///
    /// Never fails: the hash-map store has no load-factor knob.
    pub fn build_keyed<K>(self) -> KeyedDistribution<K>
    where
        K: Eq + Hash,
    {
        Distribution::from_empty_store(HashMapStore::with_capacity(self.capacity))
    }

    /// Build an `i32 → i32` distribution over the open-addressing store.
    ///
    /// Fails when the load factor lies outside `(0, 1)` or when the table
    /// sized for `capacity` would not fit in addressable memory.
    pub fn try_build_int(self) -> Result<IntDistribution, ConfigError> {
        self.try_build_open_int()
    }

    /// Build an `i32 → i64` distribution over the open-addressing store.
    pub fn try_build_wide_int(self) -> Result<WideIntDistribution, ConfigError> {
        self.try_build_open_int()
    }

    /// Like [`try_build_int`](Self::try_build_int), falling back to the
    /// default load factor when the configured one is invalid and to the
    /// default size when the table would not fit in memory.
    pub fn build_int(self) -> IntDistribution {
        self.sanitized().try_build_open_int().unwrap_or_default()
    }

    /// Like [`try_build_wide_int`](Self::try_build_wide_int), falling back to
    /// the default load factor when the configured one is invalid.
    pub fn build_wide_int(self) -> WideIntDistribution {
        self.sanitized().try_build_open_int().unwrap_or_default()
    }

    fn sanitized(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(err) => {
                debug!(%err, fallback = DEFAULT_LOAD_FACTOR, "using default load factor");
                self.load_factor(DEFAULT_LOAD_FACTOR)
            },
        }
    }

    fn try_build_open_int<C: Count>(
        self,
    ) -> Result<Distribution<i32, C, OpenIntStore<C>>, ConfigError> {
        let store = OpenIntStore::try_with_capacity_and_load_factor(self.capacity, self.load_factor)?;
        Ok(Distribution::from_empty_store(store))
    }
}
