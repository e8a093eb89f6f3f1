//! Memo of win / partial-win results, shared by every caller of one calculator.
//!
//! Entries are only ever added: results are deterministic for a given key, so
//! nothing needs invalidating. Two threads that miss on the same key at once
//! both compute it and the second insert overwrites with an identical value.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

/// Cache key. Includes the die so that a d6 and a d20 query with the same
/// target and roll bound never share an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub sides: u32,
    pub max_rolls: u32,
    pub target: u32,
}

#[derive(Debug, Default)]
pub struct ProbabilityCache {
    entries: Mutex<HashMap<CacheKey, (f64, f64)>>,
}

impl ProbabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<(f64, f64)> {
        let hit = self.lock().get(key).copied();
        debug!(?key, hit = hit.is_some(), "cache lookup");
        hit
    }

    pub fn insert(&self, key: CacheKey, value: (f64, f64)) {
        self.lock().insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave a half-written entry, so a
    // poisoned map is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, (f64, f64)>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
