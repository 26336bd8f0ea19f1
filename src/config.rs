//! Configuration Module
//!
//! Handles building and validating cache configuration, either directly in
//! code or from untyped input (environment variables, JSON).

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default maximum number of resident entries.
pub const DEFAULT_CAPACITY: usize = 1000;

// == Eviction Policy ==
/// Which entry a full cache gives up to make room for a new key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Least recently used
    #[default]
    Lru,
    /// Least frequently used, ties broken by recency
    Lfu,
}

impl FromStr for EvictionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(EvictionPolicy::Lru),
            "lfu" => Ok(EvictionPolicy::Lfu),
            _ => Err(ConfigError::InvalidValue {
                name: "eviction_policy",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::Lru => f.write_str("lru"),
            EvictionPolicy::Lfu => f.write_str("lfu"),
        }
    }
}

// == Cache Config ==
/// Cache construction parameters.
///
/// Negative capacities and TTLs cannot be expressed here; they are rejected
/// by [`CacheConfig::from_env`] and [`CacheConfig::from_json`] when parsing
/// untyped input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of resident entries
    pub capacity: usize,
    /// TTL applied when `set` is called without an explicit one
    pub default_ttl: Option<Duration>,
    /// Restart an entry's expiry clock on every successful `get`
    pub refresh_ttl_on_read: bool,
    /// Eviction policy used once the cache is full
    pub eviction_policy: EvictionPolicy,
}

impl CacheConfig {
    /// Creates an LRU configuration with the given capacity and no default TTL.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn lru(capacity: usize) -> Self {
        Self::new(capacity).with_policy(EvictionPolicy::Lru)
    }

    pub fn lfu(capacity: usize) -> Self {
        Self::new(capacity).with_policy(EvictionPolicy::Lfu)
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    pub fn with_refresh_ttl_on_read(mut self, refresh: bool) -> Self {
        self.refresh_ttl_on_read = refresh;
        self
    }

    pub fn with_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = policy;
        self
    }

    // == From Env ==
    /// Loads a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum resident entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: none)
    /// - `CACHE_REFRESH_TTL_ON_READ` - `true`/`false` (default: false)
    /// - `CACHE_EVICTION_POLICY` - `lru` or `lfu` (default: lru)
    ///
    /// Unset variables fall back to their defaults; set but malformed or
    /// negative values are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = RawConfig {
            capacity: parse_var(&lookup, "CACHE_CAPACITY")?,
            default_ttl_ms: parse_var(&lookup, "CACHE_DEFAULT_TTL_MS")?,
            refresh_ttl_on_read: lookup("CACHE_REFRESH_TTL_ON_READ")
                .map(|v| parse_bool("CACHE_REFRESH_TTL_ON_READ", &v))
                .transpose()?,
            eviction_policy: lookup("CACHE_EVICTION_POLICY"),
        };
        Self::try_from(raw)
    }

    // == From Json ==
    /// Parses a configuration object such as
    /// `{"capacity": 100, "default_ttl_ms": 5000, "eviction_policy": "lfu"}`.
    ///
    /// Every field is optional and defaults like [`CacheConfig::default`].
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(input)?;
        Self::try_from(raw)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            default_ttl: None,
            refresh_ttl_on_read: false,
            eviction_policy: EvictionPolicy::Lru,
        }
    }
}

// == Raw Config ==
/// Untyped configuration as it arrives from the outside world.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    capacity: Option<i64>,
    default_ttl_ms: Option<i64>,
    refresh_ttl_on_read: Option<bool>,
    eviction_policy: Option<String>,
}

impl TryFrom<RawConfig> for CacheConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let mut config = CacheConfig::default();

        if let Some(capacity) = raw.capacity {
            if capacity < 0 {
                return Err(ConfigError::NegativeCapacity(capacity));
            }
            config.capacity = usize::try_from(capacity).map_err(|_| ConfigError::InvalidValue {
                name: "capacity",
                value: capacity.to_string(),
            })?;
        }

        if let Some(ttl_ms) = raw.default_ttl_ms {
            if ttl_ms < 0 {
                return Err(ConfigError::NegativeTtl(ttl_ms));
            }
            config.default_ttl = Some(Duration::from_millis(ttl_ms as u64));
        }

        if let Some(refresh) = raw.refresh_ttl_on_read {
            config.refresh_ttl_on_read = refresh;
        }

        if let Some(policy) = raw.eviction_policy {
            config.eviction_policy = policy.parse()?;
        }

        Ok(config)
    }
}

// == Parsing Helpers ==
fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }),
    }
}
