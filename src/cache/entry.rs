//! Cache Entry Module
//!
//! Defines the unit of storage: a key-value pair with optional TTL and the
//! access bookkeeping the eviction policies rely on.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single resident key-value pair with its expiry metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// The key, duplicated from the index so eviction can unlink it
    pub key: K,
    /// The stored value
    pub value: V,
    /// Lifetime measured from `refreshed_at`, None = never expires
    pub ttl: Option<Duration>,
    /// Creation time, or the last time the expiry clock was restarted
    pub refreshed_at: Instant,
    /// Number of touches plus one; only the LFU policy advances it
    pub frequency: u64,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new entry with optional TTL, starting its clock now.
    pub fn new(key: K, value: V, ttl: Option<Duration>) -> Self {
        Self {
            key,
            value,
            ttl,
            refreshed_at: Instant::now(),
            frequency: 1,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the elapsed time is greater than or equal to
    /// its TTL, so a zero TTL expires immediately.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.saturating_duration_since(self.refreshed_at) >= ttl,
            None => false,
        }
    }

    // == Refresh ==
    /// Restarts the expiry clock.
    pub fn refresh(&mut self) {
        self.refreshed_at = Instant::now();
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the TTL has elapsed
    /// - `Some(remaining)` if the entry has a TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.ttl
            .map(|ttl| ttl.saturating_sub(self.refreshed_at.elapsed()))
    }
}
