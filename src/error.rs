//! Error types for the cache
//!
//! Provides unified error handling using thiserror. A missing or expired key
//! is never an error: lookups report absence through `Option`/`bool`.

use thiserror::Error;

// == Config Error Enum ==
/// Raised when untyped configuration input cannot produce a valid `CacheConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Capacity below zero
    #[error("Capacity must be non-negative, got {0}")]
    NegativeCapacity(i64),

    /// Default TTL below zero
    #[error("Default TTL must be non-negative, got {0}ms")]
    NegativeTtl(i64),

    /// A value that could not be parsed
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    /// Malformed JSON configuration
    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}

// == Cache Error Enum ==
/// Unified error type for cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Precondition violated by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Construction from untyped configuration failed
    #[error(transparent)]
    Config(#[from] ConfigError),
}

// == Invariant Error ==
/// Reported by `check_invariants` when the index and ordering structure disagree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invariant violated: {0}")]
pub struct InvariantError(pub String);

impl InvariantError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::NegativeCapacity(-3).to_string(),
            "Capacity must be non-negative, got -3"
        );
        assert_eq!(
            ConfigError::NegativeTtl(-1).to_string(),
            "Default TTL must be non-negative, got -1ms"
        );
        let err = ConfigError::InvalidValue {
            name: "CACHE_CAPACITY",
            value: "abc".to_string(),
        };
        assert!(err.to_string().contains("CACHE_CAPACITY"));
    }

    #[test]
    fn test_config_error_converts_into_cache_error() {
        let err: CacheError = ConfigError::NegativeCapacity(-1).into();
        assert!(matches!(err, CacheError::Config(ConfigError::NegativeCapacity(-1))));
        assert_eq!(err.to_string(), "Capacity must be non-negative, got -1");
    }
}
