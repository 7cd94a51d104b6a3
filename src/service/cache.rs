//! Single-slot TTL cache and the clock it is evaluated against.
//!
//! Staleness is never scheduled: it is derived from "now" and the last
//! refresh time each time the slot is read.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Fresh,
    Stale,
}

pub fn is_fresh(now: DateTime<Utc>, refreshed_at: DateTime<Utc>, ttl: TimeDelta) -> bool {
    now.signed_duration_since(refreshed_at) < ttl
}

#[derive(Debug)]
struct CacheEntry<T> {
    value: Arc<T>,
    refreshed_at: DateTime<Utc>,
}

/// One value plus the time it was stored. Replaced wholesale, never edited.
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: TimeDelta,
    slot: Mutex<Option<CacheEntry<T>>>,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    fn slot(&self) -> MutexGuard<'_, Option<CacheEntry<T>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self, now: DateTime<Utc>) -> CacheState {
        match self.slot().as_ref() {
            None => CacheState::Empty,
            Some(entry) if is_fresh(now, entry.refreshed_at, self.ttl) => CacheState::Fresh,
            Some(_) => CacheState::Stale,
        }
    }

    /// The cached value if it is still inside the TTL window.
    pub fn fresh(&self, now: DateTime<Utc>) -> Option<Arc<T>> {
        self.slot()
            .as_ref()
            .filter(|entry| is_fresh(now, entry.refreshed_at, self.ttl))
            .map(|entry| Arc::clone(&entry.value))
    }

    /// The cached value regardless of age.
    pub fn latest(&self) -> Option<Arc<T>> {
        self.slot().as_ref().map(|entry| Arc::clone(&entry.value))
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.slot().as_ref().map(|entry| entry.refreshed_at)
    }

    pub fn store(&self, value: T, refreshed_at: DateTime<Utc>) -> Arc<T> {
        let value = Arc::new(value);
        *self.slot() = Some(CacheEntry {
            value: Arc::clone(&value),
            refreshed_at,
        });
        value
    }

    pub fn clear(&self) {
        *self.slot() = None;
    }
}
