//! Error types for the freqkit library.
//!
//! ## Key Components
//!
//! - [`DistributionError`]: Returned by mutations, sorted exports and cursor
//!   operations on a frequency distribution.
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (`check_invariants` methods).
//! - [`ConfigError`]: Returned when builder parameters are invalid
//!   (e.g. a load factor outside `(0, 1)`).
//!
//! ## Example Usage
//!
//! ```
//! use freqkit::error::DistributionError;
//! use freqkit::prelude::*;
//!
//! let mut dist: KeyedDistribution<&str> = KeyedDistribution::new();
//! dist.increment("term").unwrap();
//!
//! // Absent events cannot be decremented
//! assert_eq!(dist.decrement(&"other"), Err(DistributionError::NoSuchEvent));
//!
//! // Nor can a count go below zero
//! assert!(matches!(
//!     dist.decrement_by(&"term", 2),
//!     Err(DistributionError::DecrementBelowZero { requested: 2, available: 1 })
//! ));
//! ```

use thiserror::Error;

/// Result type alias for distribution operations.
pub type Result<T> = std::result::Result<T, DistributionError>;

// ---------------------------------------------------------------------------
// DistributionError
// ---------------------------------------------------------------------------

/// Errors surfaced synchronously by distribution operations.
///
/// Every failing mutation leaves the distribution exactly as it was before
/// the call: the store and the running sum of frequencies are only touched
/// once all checks have passed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DistributionError {
    /// Decrement attempted on an event that was never observed.
    #[error("can't decrement non-existent event")]
    NoSuchEvent,

    /// Decrement amount exceeds the current count.
    #[error("can't decrement past zero: requested {requested}, available {available}")]
    DecrementBelowZero { requested: i64, available: i64 },

    /// Two entries describe the same event. Indicates a storage-layer bug,
    /// never a caller error.
    #[error("corrupted distribution: {0}")]
    CorruptedDistribution(String),

    /// A limited export asked for more events than are present.
    #[error("index out of range: requested {requested} events, distribution has {len}")]
    IndexOutOfRange { requested: usize, len: usize },

    /// The operation is not available on this value.
    #[error("operation not supported: {0}")]
    OperationNotSupported(&'static str),

    /// The per-event count or the running sum would leave its integer range.
    #[error("count overflow")]
    CountOverflow,

    /// Counts are non-negative; a negative amount was supplied.
    #[error("negative amount: {0}")]
    NegativeAmount(i64),
}

impl DistributionError {
    /// Create a corrupted-distribution error.
    pub fn corrupted(msg: impl Into<String>) -> Self {
        DistributionError::CorruptedDistribution(msg.into())
    }

    /// Returns `true` for errors that indicate broken internal state rather
    /// than a rejected request.
    pub fn is_corruption(&self) -> bool {
        matches!(self, DistributionError::CorruptedDistribution(_))
    }
}

impl From<InvariantError> for DistributionError {
    fn from(err: InvariantError) -> Self {
        DistributionError::CorruptedDistribution(err.0)
    }
}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal invariants are violated.
///
/// Produced by `check_invariants` methods on stores and distributions
/// (e.g. [`Distribution::check_invariants`](crate::distribution::Distribution::check_invariants)).
/// Carries a human-readable description of which invariant failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when builder parameters are invalid.
///
/// # Example
///
/// ```
/// use freqkit::builder::DistributionBuilder;
///
/// let err = DistributionBuilder::new()
///     .load_factor(1.5)
///     .try_build_int()
///     .unwrap_err();
/// assert!(err.to_string().contains("load factor"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
