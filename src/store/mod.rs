//! Count stores backing a [`Distribution`](crate::distribution::Distribution).
//!
//! - [`hashmap::HashMapStore`]: any `Eq + Hash` key over an `FxHashMap`.
//! - [`open_int::OpenIntStore`]: `i32` keys in a primitive open-addressing
//!   table.
//!
//! Both implement [`traits::CountStore`]; a new backend only needs that
//! trait to gain the whole distribution contract.

pub mod hashmap;
pub mod open_int;
pub mod traits;

pub use hashmap::HashMapStore;
pub use open_int::OpenIntStore;
pub use traits::{CountStore, StoreFactory};
