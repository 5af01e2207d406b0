pub use crate::builder::DistributionBuilder;
pub use crate::conditional::ConditionalDistribution;
pub use crate::distribution::{
    Distribution, IntDistribution, KeyedDistribution, WideIntDistribution,
};
pub use crate::error::{ConfigError, DistributionError, InvariantError};
pub use crate::iter::EventCursor;
pub use crate::sorted::SortedEvent;
pub use crate::traits::{Count, FrequencyDistribution};
