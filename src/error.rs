//! Error types for the cache
//!
//! Data operations never fail; only construction and configuration do.

use std::time::Duration;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache construction and configuration.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Purge interval of zero would make the sweeper spin
    #[error("Invalid purge interval: {0:?} (must be greater than zero)")]
    InvalidPurgeInterval(Duration),

    /// The background sweeper thread could not be started
    #[error("Failed to spawn sweeper thread: {0}")]
    SweeperSpawn(#[from] std::io::Error),

    /// An environment variable held an unparsable value
    #[error("Invalid value {value:?} for {var}")]
    InvalidConfig { var: &'static str, value: String },
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CacheError::InvalidPurgeInterval(Duration::ZERO);
        assert!(err.to_string().contains("must be greater than zero"));

        let err = CacheError::InvalidConfig {
            var: "CACHE_PURGE_INTERVAL_MS",
            value: "soon".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value \"soon\" for CACHE_PURGE_INTERVAL_MS"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "no threads left");
        let err: CacheError = io.into();
        assert!(matches!(err, CacheError::SweeperSpawn(_)));
    }
}
