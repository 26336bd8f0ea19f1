//! Mini Cache - A bounded in-memory key-value cache
//!
//! Offers LRU and LFU eviction, optional per-entry TTL with lazy expiry,
//! hit/miss/eviction statistics and a thread-safe façade.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Cache, CacheStats, CacheStore};
pub use config::{CacheConfig, EvictionPolicy};
pub use error::{CacheError, ConfigError, InvariantError};
