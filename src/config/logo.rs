//! Logo fetcher configuration.
//!
//! `timeout_ms` bounds one logo load inside a render. The cache and HTTP
//! settings are passed through to [`LogoFetcher`](crate::watermark::LogoFetcher).

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{
    DEFAULT_LOGO_CACHE_ENTRIES, DEFAULT_LOGO_CACHE_TTL_SECS, DEFAULT_LOGO_HTTP_TIMEOUT_SECS,
    DEFAULT_LOGO_TIMEOUT_MS,
};
use crate::watermark::LogoFetcherConfig;

fn default_timeout_ms() -> u64 {
    DEFAULT_LOGO_TIMEOUT_MS
}

fn default_cache_max_entries() -> u64 {
    DEFAULT_LOGO_CACHE_ENTRIES
}

fn default_cache_ttl_seconds() -> u64 {
    DEFAULT_LOGO_CACHE_TTL_SECS
}

fn default_http_timeout_seconds() -> u64 {
    DEFAULT_LOGO_HTTP_TIMEOUT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogoConfig {
    /// Time allowed for a logo to load during a render (default: 3000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum number of decoded logos kept in memory (default: 32)
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: u64,
    /// Cache time-to-live in seconds (default: 3600)
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,
    /// HTTP client timeout in seconds (default: 30)
    #[serde(default = "default_http_timeout_seconds")]
    pub http_timeout_seconds: u64,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            cache_max_entries: default_cache_max_entries(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
            http_timeout_seconds: default_http_timeout_seconds(),
        }
    }
}

impl LogoConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn to_fetcher_config(&self) -> LogoFetcherConfig {
        LogoFetcherConfig {
            max_cache_entries: self.cache_max_entries,
            cache_ttl: Duration::from_secs(self.cache_ttl_seconds),
            http_timeout: Duration::from_secs(self.http_timeout_seconds),
        }
    }
}
