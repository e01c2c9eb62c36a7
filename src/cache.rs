// TTL + LRU bounded cache for finished search outcomes.
//
// One mutex covers every read-check-then-write sequence, so a TTL expiry
// check can never race a concurrent write for the same key. The cache does
// not coalesce in-flight requests: two concurrent searches for the same
// normalized query both fan out before either result lands here.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::model::SearchOutcome;

/// Time source, injectable so TTL behavior is testable without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct Entry {
    value: SearchOutcome,
    stored_at: Instant,
}

struct CacheInner {
    map: HashMap<String, Entry>,
    /// Recency order, most recently used at the front.
    order: VecDeque<String>,
}

impl CacheInner {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.order.push_front(key.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.map.remove(key);
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }
}

pub struct ResultCache {
    inner: Mutex<CacheInner>,
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl ResultCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self::with_clock(capacity, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(capacity: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
            ttl,
            capacity,
            clock,
        }
    }

    /// Entries past their TTL are treated as absent and dropped on read.
    pub fn get(&self, key: &str) -> Option<SearchOutcome> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let now = self.clock.now();

        let expired = match inner.map.get(key) {
            None => return None,
            Some(entry) => now.duration_since(entry.stored_at) > self.ttl,
        };
        if expired {
            inner.remove(key);
            return None;
        }

        inner.touch(key);
        inner.map.get(key).map(|e| e.value.clone())
    }

    /// Inserts the value, evicting least-recently-used entries while over
    /// capacity.
    pub fn put(&self, key: String, value: SearchOutcome) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let stored_at = self.clock.now();

        inner.map.insert(key.clone(), Entry { value, stored_at });
        inner.touch(&key);

        while inner.map.len() > self.capacity {
            let Some(oldest) = inner.order.pop_back() else {
                break;
            };
            inner.map.remove(&oldest);
        }
    }
}
