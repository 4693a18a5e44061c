//! Expiration Tracker Module
//!
//! Maps keys to their absolute expiration instant and evicts them from the
//! store once that instant has passed.
//!
//! Lock order: whenever both locks are held, the tracker lock is taken first
//! and the store lock second. Nothing in the crate acquires them the other way.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::cache::Store;

// == Expiration Tracker ==
/// Key to expiration-instant index for entries with a finite lifespan.
#[derive(Debug, Default)]
pub struct ExpirationTracker {
    deadlines: Mutex<HashMap<String, Instant>>,
}

impl ExpirationTracker {
    // == Constructor ==
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Track ==
    /// Inserts or replaces the expiration record for `key`.
    pub fn track(&self, key: String, expires_at: Instant) {
        self.lock().insert(key, expires_at);
    }

    // == Untrack ==
    /// Removes the expiration record for `key`, if any.
    pub fn untrack(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Returns the recorded expiration instant for `key`.
    pub fn expires_at(&self, key: &str) -> Option<Instant> {
        self.lock().get(key).copied()
    }

    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no key is tracked.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // == Track With ==
    /// Inserts `value` into `store` and records its deadline as one step.
    ///
    /// Holding the tracker lock across the insert keeps a sweep from pairing
    /// the fresh value with a stale deadline left by an earlier `set`.
    ///
    /// # Arguments
    /// * `key` - The key to store and track
    /// * `expires_at` - Absolute instant after which the entry may be evicted
    /// * `store` - The store receiving the value
    /// * `value` - The value to store
    ///
    /// # Returns
    /// The value previously stored under `key`, released only after both locks.
    pub fn track_with<V>(
        &self,
        key: String,
        expires_at: Instant,
        store: &Store<V>,
        value: V,
    ) -> Option<V> {
        let mut deadlines = self.lock();
        let previous = store.insert(key.clone(), value);
        deadlines.insert(key, expires_at);
        previous
    }

    // == Purge Expired ==
    /// Evicts every key whose deadline is at or before `now` from both the
    /// tracker and `store`.
    ///
    /// Returns the number of records removed. Scans every record, so the cost
    /// is linear in the number of keys carrying a lifespan. Evicted values are
    /// dropped after both locks are released.
    pub fn purge_expired<V>(&self, now: Instant, store: &Store<V>) -> usize {
        let mut evicted: Vec<V> = Vec::new();

        let count = {
            let mut deadlines = self.lock();

            let expired: Vec<String> = deadlines
                .iter()
                .filter(|(_, expires_at)| **expires_at <= now)
                .map(|(key, _)| key.clone())
                .collect();

            if !expired.is_empty() {
                let mut entries = store.write();
                evicted.extend(expired.iter().filter_map(|key| entries.remove(key)));
            }

            for key in &expired {
                deadlines.remove(key);
            }

            expired.len()
        };

        drop(evicted);
        count
    }

    // == Flush ==
    /// Clears `store` and every expiration record as one step.
    pub fn flush<V>(&self, store: &Store<V>) {
        let flushed = {
            let mut deadlines = self.lock();
            deadlines.clear();
            store.take_all()
        };
        drop(flushed);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Instant>> {
        self.deadlines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
