//! Time-to-live cache keyed by upstream endpoint.
//!
//! The clock is always passed in, so expiry is deterministic in tests.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Identity of a cached upstream resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Kp,
    Mag,
    Uv,
    /// An image, keyed by URL.
    Image(String),
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// A map whose entries go stale after a per-entry TTL.
///
/// Stale entries are kept until overwritten so the last known value can still
/// be shown while a refresh is in flight.
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    entries: HashMap<K, Entry<V>>,
}

impl<K, V> Default for TtlCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key` if it has not expired at `now`.
    pub fn get(&self, key: &K, now: Instant) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| &entry.value)
    }

    /// Value for `key` regardless of age.
    pub fn get_stale(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    pub fn is_fresh(&self, key: &K, now: Instant) -> bool {
        self.get(key, now).is_some()
    }

    /// Store `value`, valid until `now + ttl`.
    pub fn insert(&mut self, key: K, value: V, ttl: Duration, now: Instant) {
        let expires_at = now.checked_add(ttl).unwrap_or(now);
        self.entries.insert(key, Entry { value, expires_at });
    }

    pub fn expires_at(&self, key: &K) -> Option<Instant> {
        self.entries.get(key).map(|entry| entry.expires_at)
    }

    /// Earliest expiry across all entries.
    pub fn next_expiry(&self) -> Option<Instant> {
        self.entries.values().map(|entry| entry.expires_at).min()
    }

    /// Mark every entry stale at `now` without dropping values.
    pub fn expire_all(&mut self, now: Instant) {
        for entry in self.entries.values_mut() {
            entry.expires_at = entry.expires_at.min(now);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    #[test]
    fn test_fresh_until_ttl_elapses() {
        let t0 = Instant::now();
        let mut cache = TtlCache::new();
        cache.insert(Endpoint::Kp, 4.33, TTL, t0);

        assert_eq!(cache.get(&Endpoint::Kp, t0), Some(&4.33));
        assert_eq!(cache.get(&Endpoint::Kp, t0 + TTL - Duration::from_secs(1)), Some(&4.33));
        assert_eq!(cache.get(&Endpoint::Kp, t0 + TTL), None);
        assert_eq!(cache.get_stale(&Endpoint::Kp), Some(&4.33));
    }

    #[test]
    fn test_missing_key() {
        let cache: TtlCache<Endpoint, f64> = TtlCache::new();
        assert!(cache.get(&Endpoint::Uv, Instant::now()).is_none());
        assert!(cache.is_empty());
        assert!(cache.next_expiry().is_none());
    }

    #[test]
    fn test_per_entry_ttl() {
        let t0 = Instant::now();
        let mut cache = TtlCache::new();
        cache.insert(Endpoint::Kp, "kp", TTL, t0);
        cache.insert(Endpoint::Uv, "uv", Duration::from_secs(3600), t0);

        let later = t0 + Duration::from_secs(600);
        assert!(!cache.is_fresh(&Endpoint::Kp, later));
        assert!(cache.is_fresh(&Endpoint::Uv, later));
        assert_eq!(cache.next_expiry(), Some(t0 + TTL));
    }

    #[test]
    fn test_insert_replaces_and_renews() {
        let t0 = Instant::now();
        let mut cache = TtlCache::new();
        cache.insert(Endpoint::Mag, 1, TTL, t0);
        let t1 = t0 + TTL;
        cache.insert(Endpoint::Mag, 2, TTL, t1);

        assert_eq!(cache.get(&Endpoint::Mag, t1), Some(&2));
        assert_eq!(cache.expires_at(&Endpoint::Mag), Some(t1 + TTL));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expire_all_keeps_values() {
        let t0 = Instant::now();
        let mut cache = TtlCache::new();
        cache.insert(Endpoint::Image("a.jpg".into()), 1, TTL, t0);
        cache.insert(Endpoint::Kp, 2, TTL, t0);

        cache.expire_all(t0);
        assert!(!cache.is_fresh(&Endpoint::Kp, t0));
        assert_eq!(cache.get_stale(&Endpoint::Image("a.jpg".into())), Some(&1));
    }
}
