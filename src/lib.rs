//! TTL Cache - An in-process, thread-safe key-value cache
//!
//! Values are stored under string keys with an optional lifespan. A background
//! sweeper periodically evicts entries whose lifespan has elapsed.
//!
//! ```
//! use std::time::Duration;
//! use ttl_cache::{Cache, NO_EXPIRATION};
//!
//! let cache: Cache<u32> = Cache::new(Duration::from_secs(1)).unwrap();
//! cache.set("answer", 42, NO_EXPIRATION);
//! cache.set("session", 7, Duration::from_secs(30));
//!
//! assert_eq!(cache.get("answer"), Some(42));
//! assert_eq!(cache.item_count(), 2);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheBuilder, CacheStats, Lifespan, DEFAULT_PURGE_INTERVAL, NO_EXPIRATION};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
