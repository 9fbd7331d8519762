use std::hash::Hash;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

/// Small time-bounded cache for backend lookups. Entries older than the TTL
/// are treated as absent.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: DashMap<K, (Instant, V)>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        // The shard guard is released before any removal below.
        let fresh = self.entries.get(key).and_then(|entry| {
            let (stored_at, value) = entry.value();
            (stored_at.elapsed() < self.ttl).then(|| value.clone())
        });
        if fresh.is_none() {
            self.entries
                .remove_if(key, |_, (stored_at, _)| stored_at.elapsed() >= self.ttl);
        }
        fresh
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(key, (Instant::now(), value));
    }

    /// Drops every entry. Called after any mutation of jobs.
    pub fn clear(&self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
