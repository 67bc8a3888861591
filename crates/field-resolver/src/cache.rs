//! LRU memoization of opened model runs.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use forecast_common::ForecastRun;
use lru::LruCache;
use serde::Serialize;
use tracing::debug;

use crate::dataset::DatasetSource;
use crate::error::DatasetError;

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Wraps a [`DatasetSource`] so repeated opens of the same run reuse the
/// dataset instead of going back to the transport.
///
/// Failed opens are not cached: an unpublished run is retried on the next
/// request.
pub struct LruRunCache<S: DatasetSource> {
    source: S,
    cache: Mutex<LruCache<ForecastRun, Arc<S::Dataset>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: DatasetSource> LruRunCache<S> {
    /// Create a cache holding up to `capacity` runs (at least one).
    pub fn new(source: S, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            source,
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &S {
        &self.source
    }

    pub fn stats(&self) -> CacheStats {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: cache.len(),
            capacity: cache.cap().get(),
        }
    }

    /// Drop every cached run.
    pub fn clear(&self) {
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl<S: DatasetSource> DatasetSource for LruRunCache<S> {
    type Dataset = S::Dataset;

    fn open_run(&self, run: &ForecastRun) -> Result<Arc<Self::Dataset>, DatasetError> {
        {
            let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(dataset) = cache.get(run) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(Arc::clone(dataset));
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(run = %run, "Run cache miss, opening dataset");

        // Opened outside the lock; two concurrent misses on one run both open
        // it and the later insert wins.
        let dataset = self.source.open_run(run)?;
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .put(*run, Arc::clone(&dataset));
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::MemoryDataset;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::AtomicUsize;

    struct CountingSource {
        opens: AtomicUsize,
        fail: bool,
    }

    impl DatasetSource for CountingSource {
        type Dataset = MemoryDataset;

        fn open_run(&self, run: &ForecastRun) -> Result<Arc<MemoryDataset>, DatasetError> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DatasetError::Unavailable(run.to_string()));
            }
            let t0 = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
            Ok(Arc::new(
                MemoryDataset::new(Some(*run), vec![t0], vec![0.0], vec![0.0]).unwrap(),
            ))
        }
    }

    fn run(cycle: &str) -> ForecastRun {
        ForecastRun::parse("20250115", cycle).unwrap()
    }

    #[test]
    fn test_repeated_open_hits_cache() {
        let cache = LruRunCache::new(
            CountingSource {
                opens: AtomicUsize::new(0),
                fail: false,
            },
            2,
        );

        let a = cache.open_run(&run("00")).unwrap();
        let b = cache.open_run(&run("00")).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.inner().opens.load(Ordering::SeqCst), 1);

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
        assert!((stats.hit_rate() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_eviction_reopens() {
        let cache = LruRunCache::new(
            CountingSource {
                opens: AtomicUsize::new(0),
                fail: false,
            },
            1,
        );
        cache.open_run(&run("00")).unwrap();
        cache.open_run(&run("06")).unwrap();
        cache.open_run(&run("00")).unwrap();
        assert_eq!(cache.inner().opens.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let cache = LruRunCache::new(
            CountingSource {
                opens: AtomicUsize::new(0),
                fail: true,
            },
            4,
        );
        assert!(cache.open_run(&run("12")).is_err());
        assert!(cache.open_run(&run("12")).is_err());
        assert_eq!(cache.inner().opens.load(Ordering::SeqCst), 2);
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let cache = LruRunCache::new(
            CountingSource {
                opens: AtomicUsize::new(0),
                fail: false,
            },
            0,
        );
        assert_eq!(cache.stats().capacity, 1);
    }
}
