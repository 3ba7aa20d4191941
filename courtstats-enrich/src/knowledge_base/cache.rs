//! Memoization of claim lookups
//!
//! Keyed by (entity, property). Only answered lookups are stored: a claim
//! list, or `None` when the knowledge base answered that the property is
//! absent. Transient failures are never cached.
//!
//! Concurrency: a `std::sync::Mutex` guards the map. Every method locks,
//! copies an `Arc` in or out and unlocks, so the lock is never held across an
//! await point and the cache can be shared between tasks through `Arc`.
//!
//! Unbounded by default. With a capacity the oldest entry is evicted first.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use super::claims::ClaimList;

/// Cached outcome of one claim lookup
pub type CachedClaims = Option<Arc<ClaimList>>;

type Key = (String, String);

#[derive(Default)]
struct Inner {
    entries: HashMap<Key, CachedClaims>,
    order: VecDeque<Key>,
}

#[derive(Default)]
pub struct ClaimCache {
    inner: Mutex<Inner>,
    /// 0 = unbounded
    max_entries: usize,
}

impl ClaimCache {
    /// Unbounded cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache holding at most `max_entries` lookups (0 = unbounded)
    pub fn with_capacity_limit(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            max_entries,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave the map half-updated
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// `None` on a miss, `Some(cached)` on a hit
    pub fn get(&self, entity: &str, property: &str) -> Option<CachedClaims> {
        self.lock()
            .entries
            .get(&(entity.to_string(), property.to_string()))
            .cloned()
    }

    pub fn insert(&self, entity: &str, property: &str, claims: CachedClaims) {
        let key = (entity.to_string(), property.to_string());
        let mut inner = self.lock();

        if inner.entries.insert(key.clone(), claims).is_none() {
            inner.order.push_back(key);
        }

        if self.max_entries > 0 {
            while inner.entries.len() > self.max_entries {
                match inner.order.pop_front() {
                    Some(oldest) => {
                        inner.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}
