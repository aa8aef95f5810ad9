use std::{
    num::NonZeroUsize,
    time::{Duration, Instant},
};

use lru::LruCache;

use crate::records::{QueryKey, Record};

/// Result sets kept when no capacity is configured
pub const DEFAULT_CAPACITY: usize = 1000;

struct Entry {
    records: Vec<Record>,
    stored_at: Instant,
}

/// Search results keyed by (term, mode), least recently used evicted first.
///
/// Every [`ResultStore::invalidate_all`] bumps the epoch. Inserts carry the
/// epoch observed before their request went out and are dropped if it has
/// moved on, so a search racing a load can't bring back pre-load results.
pub struct ResultStore {
    entries: LruCache<QueryKey, Entry>,
    ttl: Option<Duration>,
    epoch: u64,
}

impl ResultStore {
    /// Entries older than `ttl` are treated as missing. `None` never expires.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self::with_capacity(ttl, DEFAULT_CAPACITY)
    }

    /// A capacity of 0 is raised to 1.
    pub fn with_capacity(ttl: Option<Duration>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            entries: LruCache::new(capacity),
            ttl,
            epoch: 0,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// A hit marks the key as recently used. An expired entry is evicted.
    pub fn lookup(&mut self, key: &QueryKey) -> Option<Vec<Record>> {
        let entry = self.entries.get(key)?;

        let fresh = self
            .ttl
            .map_or(true, |ttl| entry.stored_at.elapsed() < ttl);
        if fresh {
            return Some(entry.records.clone());
        }

        self.entries.pop(key);
        None
    }

    /// Returns false when the insert was dropped because of an invalidation.
    pub fn insert(&mut self, key: QueryKey, records: Vec<Record>, epoch: u64) -> bool {
        if epoch != self.epoch {
            log::debug!("dropping results for {key}: invalidated while in flight");
            return false;
        }

        let entry = Entry {
            records,
            stored_at: Instant::now(),
        };
        // push hands back either the replaced entry or the evicted one
        if let Some((evicted, _)) = self.entries.push(key.clone(), entry) {
            if evicted != key {
                log::debug!("evicted {evicted} from result cache");
            }
        }
        true
    }

    /// Drops every entry and returns how many there were.
    pub fn invalidate_all(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        self.epoch += 1;
        dropped
    }
}
