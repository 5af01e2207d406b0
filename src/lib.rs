//! freqkit: frequency distributions over generic and integer events.
//!
//! A distribution maps each observed event to a non-negative count and keeps
//! the sum of all counts in step with every mutation. One generic core,
//! [`Distribution`], runs over pluggable count stores; the aliases below pick
//! the common combinations.
//!
//! | Type                    | Events | Counts | Store                          |
//! |-------------------------|--------|--------|--------------------------------|
//! | [`KeyedDistribution`]   | any    | `i32`  | `FxHashMap`                    |
//! | [`IntDistribution`]     | `i32`  | `i32`  | open addressing, linear probe  |
//! | [`WideIntDistribution`] | `i32`  | `i64`  | open addressing, linear probe  |
//!
//! All three share the [`FrequencyDistribution`] contract: counting,
//! sorted export by frequency or by event, and allocation-free traversal.
//! [`ConditionalDistribution`] layers per-condition distributions and
//! marginal counts on top of [`IntDistribution`].
//!
//! ```
//! use freqkit::prelude::*;
//!
//! let mut dist = IntDistribution::new();
//! for event in [3, 1, 3, 2, 3, 1] {
//!     dist.increment(event).unwrap();
//! }
//! let top = dist.frequency_sorted_events_limited(1).unwrap();
//! assert_eq!(top[0].into_pair(), (3, 3));
//! assert_eq!(dist.sum_of_frequencies(), 6);
//! ```

pub mod builder;
pub mod conditional;
pub mod distribution;
pub mod error;
pub mod iter;
pub mod prelude;
pub mod sorted;
pub mod store;
pub mod traits;

pub use crate::builder::DistributionBuilder;
pub use crate::conditional::ConditionalDistribution;
pub use crate::distribution::{
    Distribution, IntDistribution, KeyedDistribution, WideIntDistribution,
};
pub use crate::error::{ConfigError, DistributionError, InvariantError, Result};
pub use crate::iter::EventCursor;
pub use crate::sorted::SortedEvent;
pub use crate::traits::{Count, FrequencyDistribution};
