//! Cache Facade Module
//!
//! Wires a `Store` and an `ExpirationTracker` together and owns the
//! background sweeper that evicts expired entries.

use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::info;

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheStats, ExpirationTracker, Lifespan, Store, DEFAULT_PURGE_INTERVAL};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::{self, Sweep, SweeperHandle};

// == Shared State ==
/// State reachable from both the caller-facing handle and the sweeper.
struct Shared<V> {
    store: Store<V>,
    tracker: ExpirationTracker,
    stats: StatsCounters,
}

impl<V> Shared<V> {
    fn new() -> Self {
        Self {
            store: Store::new(),
            tracker: ExpirationTracker::new(),
            stats: StatsCounters::default(),
        }
    }
}

impl<V: Send + Sync + 'static> Sweep for Shared<V> {
    fn sweep(&self) -> usize {
        let expired = self.tracker.purge_expired(Instant::now(), &self.store);
        self.stats.record_sweep(expired);
        expired
    }
}

// == Cache ==
/// Thread-safe key-value cache with optional per-entry lifespan.
///
/// Entries set with a finite lifespan are evicted by a background sweep that
/// runs every purge interval, so an entry may stay visible for up to one
/// interval past its deadline. Share a cache across threads with `Arc<Cache<V>>`.
///
/// Dropping the cache stops its sweeper.
pub struct Cache<V> {
    shared: Arc<Shared<V>>,
    sweeper: Mutex<Option<SweeperHandle>>,
    purge_interval: Duration,
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructors ==
    /// Creates a cache and starts its sweeper on a dedicated thread.
    ///
    /// # Arguments
    /// * `purge_interval` - Period between two sweeps, must be non-zero
    ///
    /// # Errors
    /// `InvalidPurgeInterval` for a zero interval, `SweeperSpawn` if the
    /// sweeper thread cannot be started.
    pub fn new(purge_interval: Duration) -> Result<Self> {
        Self::builder().purge_interval(purge_interval).build()
    }

    /// Creates a cache sweeping every `DEFAULT_PURGE_INTERVAL`.
    pub fn with_default_interval() -> Result<Self> {
        Self::builder().build()
    }

    /// Creates a cache from loaded configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Self::new(config.purge_interval)
    }

    /// Returns a builder for finer control over how the sweeper runs.
    pub fn builder() -> CacheBuilder<V> {
        CacheBuilder::new()
    }

    // == Get ==
    /// Returns a clone of the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<V> {
        let value = self.shared.store.get(key);
        match value {
            Some(_) => self.shared.stats.record_hit(),
            None => self.shared.stats.record_miss(),
        }
        value
    }

    // == Set ==
    /// Inserts or replaces the value for `key`.
    ///
    /// A finite lifespan registers the entry for expiration; `NO_EXPIRATION`
    /// drops any deadline left by an earlier `set` of the same key.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `lifespan` - A `Duration`, `Option<Duration>` or `Lifespan`
    pub fn set(&self, key: impl Into<String>, value: V, lifespan: impl Into<Lifespan>) {
        let key = key.into();
        let expires_at = lifespan.into().expires_at(Instant::now());

        let previous = match expires_at {
            // Value and deadline land together, so a sweep can never see the
            // new value next to an older, already elapsed deadline.
            Some(deadline) => {
                self.shared
                    .tracker
                    .track_with(key, deadline, &self.shared.store, value)
            }
            // Untrack first: once the stale deadline is gone no sweep can
            // evict the key, so the two locks need not nest.
            None => {
                self.shared.tracker.untrack(&key);
                self.shared.store.insert(key, value)
            }
        };
        drop(previous);
    }
}

impl<V> Cache<V> {
    // == Delete ==
    /// Removes `key` and its expiration record. Deleting an absent key is a no-op.
    pub fn delete(&self, key: &str) {
        self.shared.store.remove(key);
        self.shared.tracker.untrack(key);
    }

    // == Item Count ==
    /// Returns the number of entries currently stored.
    pub fn item_count(&self) -> usize {
        self.shared.store.len()
    }

    // == Flush ==
    /// Removes every entry and every pending expiration.
    pub fn flush(&self) {
        self.shared.tracker.flush(&self.shared.store);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.shared
            .stats
            .snapshot(self.shared.store.len(), self.shared.tracker.len())
    }

    /// Returns the period between two sweeps.
    pub fn purge_interval(&self) -> Duration {
        self.purge_interval
    }

    // == Close ==
    /// Stops the background sweeper. Idempotent.
    ///
    /// The cache keeps serving reads and writes afterwards, but expired
    /// entries are only removed by explicit `purge_expired` calls.
    pub fn close(&self) {
        let handle = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(mut handle) = handle {
            handle.stop();
            info!("Cache sweeper stopped");
        }
    }

    /// Returns true while the background sweeper is running.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<V: Send + Sync + 'static> Cache<V> {
    // == Purge Expired ==
    /// Runs one sweep immediately, returning the number of evicted entries.
    pub fn purge_expired(&self) -> usize {
        self.shared.sweep()
    }
}

impl<V> Drop for Cache<V> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<V> fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("item_count", &self.item_count())
            .field("tracked", &self.shared.tracker.len())
            .field("purge_interval", &self.purge_interval)
            .finish()
    }
}

// == Cache Builder ==
/// Configures and constructs a `Cache`.
pub struct CacheBuilder<V> {
    purge_interval: Duration,
    _values: PhantomData<fn() -> V>,
}

impl<V> CacheBuilder<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a builder with the default purge interval.
    pub fn new() -> Self {
        Self {
            purge_interval: DEFAULT_PURGE_INTERVAL,
            _values: PhantomData,
        }
    }

    /// Sets the period between two sweeps.
    pub fn purge_interval(mut self, purge_interval: Duration) -> Self {
        self.purge_interval = purge_interval;
        self
    }

    /// Builds the cache with its sweeper on a dedicated OS thread.
    pub fn build(self) -> Result<Cache<V>> {
        self.validate()?;
        let shared = Arc::new(Shared::new());
        let sweeper = tasks::spawn_sweeper_thread(shared.clone(), self.purge_interval)?;
        Ok(self.assemble(shared, sweeper.into()))
    }

    /// Builds the cache with its sweeper as a task on the given tokio runtime.
    pub fn build_on(self, runtime: &tokio::runtime::Handle) -> Result<Cache<V>> {
        self.validate()?;
        let shared = Arc::new(Shared::new());
        let sweeper = tasks::spawn_sweep_task(runtime, shared.clone(), self.purge_interval);
        Ok(self.assemble(shared, sweeper.into()))
    }

    fn validate(&self) -> Result<()> {
        if self.purge_interval.is_zero() {
            return Err(CacheError::InvalidPurgeInterval(self.purge_interval));
        }
        Ok(())
    }

    fn assemble(self, shared: Arc<Shared<V>>, sweeper: SweeperHandle) -> Cache<V> {
        Cache {
            shared,
            sweeper: Mutex::new(Some(sweeper)),
            purge_interval: self.purge_interval,
        }
    }
}

impl<V> Default for CacheBuilder<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
