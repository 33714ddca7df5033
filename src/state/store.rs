//! Capacity-bounded key/value store whose entries expire after a fixed TTL.
//!
//! Eviction is FIFO by insertion: when a new key would exceed the capacity,
//! expired entries are purged first and then the oldest-inserted entry goes.
//! Reads never reorder entries.

use std::{hash::Hash, time::Duration};

use indexmap::IndexMap;
use tokio::{sync::Mutex, time::Instant};

/// Value stored alongside its expiry deadline.
#[derive(Debug, Clone)]
pub struct ExpiringEntry<V> {
    /// Stored value.
    pub value: V,
    /// Instant after which the entry is treated as absent.
    pub expires_at: Instant,
}

impl<V> ExpiringEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Thread-safe expiring store shared by every request handler.
#[derive(Debug)]
pub struct ExpiringStore<K, V> {
    entries: Mutex<IndexMap<K, ExpiringEntry<V>>>,
    capacity: usize,
    ttl: Duration,
}

impl<K, V> ExpiringStore<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Build an empty store. A `capacity` of zero is bumped to one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(IndexMap::with_capacity(capacity)),
            capacity,
            ttl,
        }
    }

    /// Insert or overwrite `key`, resetting its expiry to `now + ttl`.
    pub async fn put(&self, key: K, value: V) {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        self.insert_locked(&mut entries, key, value, now);
    }

    /// Return a clone of the live value stored under `key`.
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        Self::live_value(&mut entries, key, now).cloned()
    }

    /// Whether a live entry exists for `key`.
    pub async fn contains(&self, key: &K) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        Self::live_value(&mut entries, key, now).is_some()
    }

    /// Remove `key` if present.
    pub async fn delete(&self, key: &K) {
        let mut entries = self.entries.lock().await;
        entries.shift_remove(key);
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        let now = Instant::now();
        entries.values().filter(|entry| entry.is_live(now)).count()
    }

    /// Whether the store holds no live entry.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every expired entry, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        Self::purge_locked(&mut entries, now)
    }

    fn live_value<'a>(
        entries: &'a mut IndexMap<K, ExpiringEntry<V>>,
        key: &K,
        now: Instant,
    ) -> Option<&'a V> {
        let expired = entries.get(key).is_some_and(|entry| !entry.is_live(now));
        if expired {
            entries.shift_remove(key);
            return None;
        }
        entries.get(key).map(|entry| &entry.value)
    }

    fn insert_locked(
        &self,
        entries: &mut IndexMap<K, ExpiringEntry<V>>,
        key: K,
        value: V,
        now: Instant,
    ) {
        // Overwrites count as a fresh insertion for eviction order.
        entries.shift_remove(&key);

        if entries.len() >= self.capacity {
            Self::purge_locked(entries, now);
        }
        while entries.len() >= self.capacity {
            if entries.shift_remove_index(0).is_none() {
                break;
            }
        }

        entries.insert(
            key,
            ExpiringEntry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }

    fn purge_locked(entries: &mut IndexMap<K, ExpiringEntry<V>>, now: Instant) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }
}
