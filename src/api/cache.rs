//! Response caching for repeated identical requests
//!
//! Projections are deterministic, so a rendered response body can be reused
//! for any request with the same validated parameters until the entry expires.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::params::SavingsParameters;

/// Storage for rendered response bodies
pub trait ResponseCache: Send + Sync {
    /// Cached body for `key`, if present and fresh
    fn get(&self, key: &str) -> Option<String>;

    /// Store a body under `key`
    fn put(&self, key: String, body: String);
}

impl<T: ResponseCache + ?Sized> ResponseCache for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn put(&self, key: String, body: String) {
        (**self).put(key, body)
    }
}

/// Cache key for a validated parameter set
///
/// `{:?}` prints the shortest round-trip form of each float, so equal values
/// always produce equal keys.
pub fn cache_key(params: &SavingsParameters) -> String {
    format!(
        "projection:{:?}:{:?}:{:?}:{}",
        params.initial_amount(),
        params.monthly_deposit(),
        params.interest_rate(),
        params.years()
    )
}

/// Cache that never stores anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl ResponseCache for NoCache {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn put(&self, _key: String, _body: String) {}
}

struct CacheEntry {
    stored_at: Instant,
    body: String,
}

/// Hit/miss counters for a [`TtlCache`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    /// Get cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// In-memory cache whose entries expire `ttl` after being stored
///
/// Holds at most `max_entries` bodies; storing into a full cache first drops
/// expired entries, then the oldest ones.
pub struct TtlCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TtlCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }

    /// Clear all cached data
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Remove expired entries
    pub fn cleanup_expired(&self) {
        self.cleanup_expired_at(Instant::now());
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.stored_at) < self.ttl
    }

    fn cleanup_expired_at(&self, now: Instant) {
        self.entries.retain(|_, entry| self.is_fresh(entry, now));
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<String> {
        let body = self
            .entries
            .get(key)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.body.clone());

        let counter = if body.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        body
    }

    fn put_at(&self, key: String, body: String, now: Instant) {
        if self.max_entries == 0 {
            return;
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.cleanup_expired_at(now);
            while self.entries.len() >= self.max_entries {
                if !self.evict_oldest() {
                    break;
                }
            }
        }

        self.entries.insert(key, CacheEntry { stored_at: now, body });
    }

    /// Drop the entry stored longest ago; false if the cache is empty
    fn evict_oldest(&self) -> bool {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().stored_at)
            .map(|entry| entry.key().clone());

        match oldest {
            Some(key) => self.entries.remove(&key).is_some(),
            None => false,
        }
    }
}

impl ResponseCache for TtlCache {
    fn get(&self, key: &str) -> Option<String> {
        self.get_at(key, Instant::now())
    }

    fn put(&self, key: String, body: String) {
        self.put_at(key, body, Instant::now())
    }
}
