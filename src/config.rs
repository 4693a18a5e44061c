//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::DEFAULT_PURGE_INTERVAL;
use crate::error::{CacheError, Result};

/// Environment variable holding the sweep period in milliseconds.
pub const PURGE_INTERVAL_VAR: &str = "CACHE_PURGE_INTERVAL_MS";

/// Cache configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Period between two background sweeps
    pub purge_interval: Duration,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_PURGE_INTERVAL_MS` - Sweep period in milliseconds (default: 60000)
    ///
    /// Unlike a silent fallback, a present but malformed value is reported.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            purge_interval: parse_interval_ms(env::var(PURGE_INTERVAL_VAR).ok())?,
        })
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            purge_interval: DEFAULT_PURGE_INTERVAL,
        }
    }
}

fn parse_interval_ms(raw: Option<String>) -> Result<Duration> {
    match raw {
        None => Ok(DEFAULT_PURGE_INTERVAL),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(0) => Err(CacheError::InvalidPurgeInterval(Duration::ZERO)),
            Ok(ms) => Ok(Duration::from_millis(ms)),
            Err(_) => Err(CacheError::InvalidConfig {
                var: PURGE_INTERVAL_VAR,
                value,
            }),
        },
    }
}
