//! In-process TTL cache for provider responses.
//!
//! A plain key-value store with timestamped entries. Entries older than the
//! cache's time-to-live are treated as absent, forcing a fresh fetch.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

struct Entry<V> {
    inserted: Instant,
    value: V,
}

/// A map whose entries expire a fixed duration after insertion.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, Entry<V>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Look up a value, returning `None` if it is absent or expired.
    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        let entry = self.entries.get(key)?;
        if now.duration_since(entry.inserted) < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Insert a value, timestamped now. Replaces any previous entry.
    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    fn insert_at(&mut self, key: K, value: V, now: Instant) {
        self.entries.insert(
            key,
            Entry {
                inserted: now,
                value,
            },
        );
    }

    /// Drop expired entries so long-running sessions don't accumulate them.
    pub fn purge_expired(&mut self) {
        let now = Instant::now();
        let ttl = self.ttl;
        self.entries
            .retain(|_, e| now.duration_since(e.inserted) < ttl);
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_within_ttl() {
        let mut cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(3600));
        let t0 = Instant::now();
        cache.insert_at("AAPL".to_string(), 42, t0);

        let just_before_expiry = t0 + Duration::from_secs(3599);
        assert_eq!(cache.get_at(&"AAPL".to_string(), just_before_expiry), Some(42));
    }

    #[test]
    fn test_miss_after_ttl() {
        let mut cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(3600));
        let t0 = Instant::now();
        cache.insert_at("AAPL".to_string(), 42, t0);

        let after_expiry = t0 + Duration::from_secs(3600);
        assert_eq!(cache.get_at(&"AAPL".to_string(), after_expiry), None);
    }

    #[test]
    fn test_miss_for_absent_key() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get(&"TSLA".to_string()), None);
    }

    #[test]
    fn test_keyed_by_ticker_and_period() {
        let mut cache: TtlCache<(String, String), u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert(("AAPL".to_string(), "1mo".to_string()), 1);
        cache.insert(("AAPL".to_string(), "5d".to_string()), 2);

        assert_eq!(cache.get(&("AAPL".to_string(), "1mo".to_string())), Some(1));
        assert_eq!(cache.get(&("AAPL".to_string(), "5d".to_string())), Some(2));
        assert_eq!(cache.get(&("TSLA".to_string(), "1mo".to_string())), None);
    }

    #[test]
    fn test_insert_replaces_and_refreshes() {
        let mut cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(100));
        let t0 = Instant::now();
        cache.insert_at("NVDA".to_string(), 1, t0);
        cache.insert_at("NVDA".to_string(), 2, t0 + Duration::from_secs(90));

        // Old timestamp would have expired here; the re-insert keeps it live.
        let t = t0 + Duration::from_secs(150);
        assert_eq!(cache.get_at(&"NVDA".to_string(), t), Some(2));
    }

    #[test]
    fn test_purge_expired() {
        let mut cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(0));
        cache.insert("AAPL".to_string(), 1);
        cache.purge_expired();
        assert_eq!(cache.len(), 0);
    }
}
