//! Typed clients for the Surge/Taiko Pacaya protocol contracts.
//!
//! Each client binds a contract address to an alloy [`Provider`](alloy::providers::Provider)
//! and exposes one method per contract function plus filter, watch and parse
//! helpers per event. The raw `sol!` bindings are re-exported next to each
//! client for direct use.
pub mod contract;
pub mod error;
pub mod pacaya;

pub use contract::{
    BoundContract, CallOpts, DecodedLog, EventSubscription, FilterOpts, IndexedFilter, LogIterator,
    TransactOpts, WatchOpts,
};
pub use error::BindingError;

#[cfg(any(test, feature = "test-util"))]
#[doc(hidden)]
pub mod test_util;
