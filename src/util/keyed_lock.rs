//! Per-key asynchronous mutual exclusion.
//!
//! The bot processes commands on a single logical actor, but every call out
//! to persistence or to Discord is an await point where another command can
//! interleave. Two commands touching the same team or the same player must
//! therefore behave as if protected by a mutual-exclusion lock keyed by that
//! entity, even though there is no true parallelism. `KeyedMutex` provides
//! that lock: one `tokio::sync::Mutex` per key, created on first use.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A map of async mutexes, one per key.
///
/// `acquire` returns an owned guard; holding it excludes every other task
/// that acquires the same key while leaving unrelated keys untouched. Lock
/// entries accumulate as keys are seen; `purge_unused` drops the ones nobody
/// currently holds or awaits.
pub struct KeyedMutex<K> {
    locks: StdMutex<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K: Eq + Hash + Clone> KeyedMutex<K> {
    pub fn new() -> Self {
        Self {
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Acquires the mutex for `key`, waiting until it is free.
    ///
    /// The returned guard releases the key when dropped. The inner map lock
    /// is only held to look up or insert the entry, never across the await.
    pub async fn acquire(&self, key: K) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().expect("keyed lock map poisoned");
            locks
                .entry(key)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        lock.lock_owned().await
    }

    /// Drops lock entries that no task currently holds or awaits.
    ///
    /// An entry is in use while any guard or pending `acquire` still owns a
    /// clone of its `Arc`; those entries are kept. Called periodically by the
    /// janitor so the map does not grow with every player ever seen.
    pub fn purge_unused(&self) {
        let mut locks = self.locks.lock().expect("keyed lock map poisoned");
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.locks.lock().expect("keyed lock map poisoned").len()
    }
}

impl<K: Eq + Hash + Clone> Default for KeyedMutex<K> {
    fn default() -> Self {
        Self::new()
    }
}
