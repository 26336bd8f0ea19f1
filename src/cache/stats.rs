//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
///
/// Counters saturate at `u64::MAX` instead of wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of lookups for keys that were not resident
    pub misses: u64,
    /// Number of entries removed by the policy or by expiry
    pub evictions: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses). A cache that has not served any
    /// lookup yet reports `1.0`, not `0.0` or NaN.
    pub fn hit_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            1.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// hits + misses, clamped at `u64::MAX`.
    pub fn lookups(&self) -> u64 {
        self.hits.saturating_add(self.misses)
    }

    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits = self.hits.saturating_add(1);
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses = self.misses.saturating_add(1);
    }

    // == Record Eviction ==
    pub fn record_eviction(&mut self) {
        self.evictions = self.evictions.saturating_add(1);
    }
}
