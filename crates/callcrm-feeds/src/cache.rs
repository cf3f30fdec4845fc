//! Time-bounded memo for fetched sheets, keyed by source URL.
//!
//! Entries older than the freshness window are treated as absent and pruned
//! on access. There is no size bound: a session only ever loads a handful of
//! sheets.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct Entry<T> {
    value: Arc<T>,
    stored_at: Instant,
}

pub struct TtlCache<T> {
    ttl: Duration,
    entries: HashMap<String, Entry<T>>,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: HashMap::new() }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for `key`, if any.
    pub fn get(&mut self, key: &str) -> Option<Arc<T>> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: T) -> Arc<T> {
        self.insert_at(key.into(), value, Instant::now())
    }

    /// Forget `key` so the next lookup misses.
    pub fn invalidate(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get_at(&mut self, key: &str, now: Instant) -> Option<Arc<T>> {
        self.prune(now);
        self.entries.get(key).map(|e| Arc::clone(&e.value))
    }

    fn insert_at(&mut self, key: String, value: T, now: Instant) -> Arc<T> {
        self.prune(now);
        let value = Arc::new(value);
        self.entries.insert(key, Entry { value: Arc::clone(&value), stored_at: now });
        value
    }

    fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.stored_at) < ttl);
    }
}
