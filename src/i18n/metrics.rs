//! Tree cache metrics.
//!
//! Counts cache lookups and tree builds so that the lazy population of
//! translation trees can be observed.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for one tree cache.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    /// Number of lookups answered from the cache
    hits: AtomicUsize,

    /// Number of lookups that had to build a tree
    misses: AtomicUsize,

    /// Number of trees inserted into the cache
    trees_built: AtomicUsize,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lookup answered from the cache.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup that missed the cache.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a tree inserted into the cache.
    ///
    /// Two threads missing on the same locale may both build a tree; only the
    /// one that actually lands in the cache is counted here.
    pub fn record_build(&self) {
        self.trees_built.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn trees_built(&self) -> usize {
        self.trees_built.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.hits();
        let misses = self.misses();
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate: hit_rate,
            trees_built: self.trees_built(),
        }
    }

    /// Reset all counters to zero (useful for testing).
    #[cfg(test)]
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.trees_built.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of the cache counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    /// Number of cache hits
    pub cache_hits: usize,

    /// Number of cache misses
    pub cache_misses: usize,

    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    /// Number of trees built and cached
    pub trees_built: usize,
}
