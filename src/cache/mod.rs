//! Cache Module
//!
//! Provides bounded in-memory caching with LRU or LFU eviction and lazy TTL
//! expiration.

mod arena;
mod entry;
mod lfu;
mod lru;
mod shared;
mod stats;
mod store;
mod tracker;


// Re-export public types
pub use arena::NodeId;
pub use entry::CacheEntry;
pub use lfu::LfuTracker;
pub use lru::LruTracker;
pub use shared::Cache;
pub use stats::CacheStats;
pub use store::CacheStore;
