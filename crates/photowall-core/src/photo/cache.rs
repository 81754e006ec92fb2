//! Time-windowed read-through cache entries
//!
//! Ages are measured with `tokio::time::Instant` so tests can drive the clock.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

/// Cache windows for catalog data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// How long a consumer may keep using a snapshot without asking again
    pub stale: Duration,
    /// Age at which a value is still served but refreshed in the background
    pub revalidate: Duration,
    /// Age at which a value is no longer served
    pub expire: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            stale: Duration::from_secs(3600),
            revalidate: Duration::from_secs(900),
            expire: Duration::from_secs(86400),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
    Expired,
}

impl CachePolicy {
    pub fn classify(&self, age: Duration) -> Freshness {
        if age >= self.expire {
            Freshness::Expired
        } else if age >= self.revalidate {
            Freshness::Stale
        } else {
            Freshness::Fresh
        }
    }
}

/// Result of a cache lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<V> {
    Fresh(V),
    /// Usable, but a refresh should be started
    Stale(V),
    Miss,
}

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

pub struct TtlCache<K, V> {
    policy: CachePolicy,
    entries: Mutex<HashMap<K, Entry<V>>>,
    refreshing: Mutex<HashSet<K>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            entries: Mutex::new(HashMap::new()),
            refreshing: Mutex::new(HashSet::new()),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Look up a key; expired entries are evicted and reported as a miss
    pub fn get(&self, key: &K) -> Lookup<V> {
        let mut entries = lock(&self.entries);
        let Some(entry) = entries.get(key) else {
            return Lookup::Miss;
        };

        match self.policy.classify(entry.stored_at.elapsed()) {
            Freshness::Fresh => Lookup::Fresh(entry.value.clone()),
            Freshness::Stale => Lookup::Stale(entry.value.clone()),
            Freshness::Expired => {
                entries.remove(key);
                Lookup::Miss
            }
        }
    }

    pub fn insert(&self, key: K, value: V) {
        lock(&self.entries).insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        lock(&self.entries).clear();
    }

    /// Claim the background refresh for a key; false if one is already running
    pub fn begin_refresh(&self, key: &K) -> bool {
        lock(&self.refreshing).insert(key.clone())
    }

    pub fn end_refresh(&self, key: &K) {
        lock(&self.refreshing).remove(key);
    }
}
