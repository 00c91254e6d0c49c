//! Read-through cache of per-year astronomical results.
//!
//! Entries are computed once and never change, so racing writers simply
//! store the same value. Clones share the underlying map.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

/// Year-keyed cache of instants or day numbers.
#[derive(Debug, Clone, Default)]
pub struct YearCache {
    name: &'static str,
    entries: Arc<RwLock<HashMap<i32, i64>>>,
}

impl YearCache {
    /// Create an empty cache. `name` labels log output.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Arc::default(),
        }
    }

    /// Cached value for `year`, if present.
    pub fn get(&self, year: i32) -> Option<i64> {
        self.entries.read().get(&year).copied()
    }

    /// Store a value for `year`.
    pub fn insert(&self, year: i32, value: i64) {
        self.entries.write().insert(year, value);
    }

    /// Cached value for `year`, computing and storing it on a miss.
    ///
    /// `compute` runs without the lock held.
    pub fn get_or_insert_with<F>(&self, year: i32, compute: F) -> i64
    where
        F: FnOnce() -> i64,
    {
        if let Some(v) = self.get(year) {
            return v;
        }
        let value = compute();
        debug!(cache = self.name, year, value, "populated year cache");
        self.insert(year, value);
        value
    }

    /// Fallible variant of [`get_or_insert_with`](Self::get_or_insert_with).
    /// Failures are not cached.
    pub fn try_get_or_insert_with<F, E>(&self, year: i32, compute: F) -> Result<i64, E>
    where
        F: FnOnce() -> Result<i64, E>,
    {
        if let Some(v) = self.get(year) {
            return Ok(v);
        }
        let value = compute()?;
        debug!(cache = self.name, year, value, "populated year cache");
        self.insert(year, value);
        Ok(value)
    }

    /// Number of cached years.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn computes_once() {
        let cache = YearCache::new("test");
        let calls = Cell::new(0);
        for _ in 0..3 {
            let v = cache.get_or_insert_with(2001, || {
                calls.set(calls.get() + 1);
                42
            });
            assert_eq!(v, 42);
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn clones_share_entries() {
        let a = YearCache::new("test");
        let b = a.clone();
        a.insert(1, 10);
        assert_eq!(b.get(1), Some(10));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let cache = YearCache::new("test");
        let r: Result<i64, ()> = cache.try_get_or_insert_with(5, || Err(()));
        assert!(r.is_err());
        assert!(cache.is_empty());
    }
}
