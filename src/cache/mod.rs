//! Cache Module
//!
//! Provides the in-memory store, its expiration tracker, and the `Cache`
//! facade tying both to a background sweeper.

mod lifespan;
mod stats;
mod store;
mod tracker;
mod ttl_cache;

#[cfg(test)]
mod property_tests;

use std::time::Duration;

// Re-export public types
pub use lifespan::{Lifespan, NO_EXPIRATION};
pub use stats::CacheStats;
pub use store::Store;
pub use tracker::ExpirationTracker;
pub use ttl_cache::{Cache, CacheBuilder};

// == Public Constants ==
/// Sweep period used when none is configured
pub const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(60);
