//! Cache Store Module
//!
//! The authoritative key-value mapping, guarded by a reader/writer lock.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

// == Store ==
/// Key-value storage shared between callers and the sweeper.
///
/// Readers proceed concurrently; writers exclude everyone. Each method holds
/// the lock only for the map operation itself.
#[derive(Debug)]
pub struct Store<V> {
    entries: RwLock<HashMap<String, V>>,
}

impl<V> Store<V> {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    // == Insert ==
    /// Inserts or replaces the value for `key`, returning the previous value.
    ///
    /// The previous value is handed back rather than dropped under the lock.
    pub fn insert(&self, key: String, value: V) -> Option<V> {
        self.write().insert(key, value)
    }

    // == Remove ==
    /// Removes `key`, returning its value if it was present.
    pub fn remove(&self, key: &str) -> Option<V> {
        self.write().remove(key)
    }

    // == Length ==
    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // == Flush ==
    /// Replaces the mapping with an empty one, returning the old mapping.
    pub fn take_all(&self) -> HashMap<String, V> {
        std::mem::take(&mut *self.write())
    }

    // A panicking writer cannot leave the map half-updated: every critical
    // section is a single HashMap call.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, V>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, V>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone> Store<V> {
    // == Get ==
    /// Returns a clone of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<V> {
        self.read().get(key).cloned()
    }
}

impl<V> Default for Store<V> {
    fn default() -> Self {
        Self::new()
    }
}
