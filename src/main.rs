//! Mini Cache - demo driver
//!
//! Loads a cache configuration from the environment, runs the same scripted
//! workload against an LRU and an LFU cache, and prints both stat reports as
//! JSON.

use std::thread::sleep;
use std::time::Duration;

use anyhow::Context;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_cache::{Cache, CacheConfig, EvictionPolicy};

/// Number of distinct keys the workload writes.
const DEMO_KEYS: u64 = 64;
/// Lifetime of the short-lived session entry.
const SESSION_TTL: Duration = Duration::from_millis(30);

fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mini Cache demo");

    let config = CacheConfig::from_env().context("invalid cache configuration")?;
    info!(
        "Configuration loaded: capacity={}, default_ttl={:?}, refresh_ttl_on_read={}",
        config.capacity, config.default_ttl, config.refresh_ttl_on_read
    );

    let mut report = serde_json::Map::new();
    for policy in [EvictionPolicy::Lru, EvictionPolicy::Lfu] {
        let cache = Cache::new(config.clone().with_policy(policy));
        let hottest = run_workload(&cache);
        let stats = cache.stats();

        info!(
            "{} workload finished: hits={}, misses={}, evictions={}",
            policy, stats.hits, stats.misses, stats.evictions
        );
        report.insert(
            policy.to_string(),
            json!({
                "stats": stats,
                "hit_rate": stats.hit_rate(),
                "resident": cache.len(),
                "hottest": hottest,
            }),
        );
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Writes `DEMO_KEYS` keys, reads them with a skew towards low indices, and
/// exercises lazy expiry. Returns the top keys in the policy's order.
fn run_workload(cache: &Cache<String, u64>) -> Vec<String> {
    for i in 0..DEMO_KEYS {
        cache.set(format!("key{i}"), i);
    }

    // key0 is read on every round, key1 on every other, and so on
    for round in 1..=8u64 {
        for i in (0..DEMO_KEYS).filter(|i| round % (i + 1) == 0) {
            cache.get(&format!("key{i}"));
        }
    }

    cache.set_with_ttl("session".to_string(), u64::MAX, SESSION_TTL);
    if cache.get("session").is_none() {
        warn!("session entry was not retained");
    }
    sleep(SESSION_TTL + Duration::from_millis(10));
    if cache.get("session").is_some() {
        warn!("session entry outlived its TTL");
    }

    let resident = cache.len();
    if resident == 0 {
        return Vec::new();
    }
    match cache.top_k(resident.min(5)) {
        Ok(top) => top.into_iter().map(|(key, _)| key).collect(),
        Err(err) => {
            warn!("top-k query failed: {}", err);
            Vec::new()
        }
    }
}
