//! Configuration types for the search backend and the query client.

use std::time::Duration;

use serde::Deserialize;

use crate::connect::DEFAULT_RETRY_DELAY;
use crate::raw_search::DEFAULT_RAW_TIMEOUT;

/// Default search backend URL.
pub const DEFAULT_SEARCH_URL: &str = "http://localhost:9200";

/// Connection settings for the search backend.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchBackendConfig {
    /// Base URL of the backend.
    #[serde(default = "default_url")]
    pub url: String,
    /// Seconds to wait between connection attempts.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
    /// Timeout of raw HTTP queries, in seconds.
    #[serde(default = "default_raw_timeout_secs")]
    pub raw_timeout_secs: u64,
}

fn default_url() -> String {
    DEFAULT_SEARCH_URL.to_string()
}

fn default_retry_delay_secs() -> u64 {
    DEFAULT_RETRY_DELAY.as_secs()
}

fn default_raw_timeout_secs() -> u64 {
    DEFAULT_RAW_TIMEOUT.as_secs()
}

impl Default for SearchBackendConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            retry_delay_secs: default_retry_delay_secs(),
            raw_timeout_secs: default_raw_timeout_secs(),
        }
    }
}

impl SearchBackendConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn raw_timeout(&self) -> Duration {
        Duration::from_secs(self.raw_timeout_secs)
    }
}

/// Configuration for the SearchIndexClient.
#[derive(Debug, Clone)]
pub struct SearchIndexConfig {
    /// Maximum number of hits allowed in a single page.
    /// Set to None to disable the limit (not recommended for production).
    pub max_page_size: Option<usize>,
}

impl Default for SearchIndexConfig {
    fn default() -> Self {
        Self {
            max_page_size: Some(1000),
        }
    }
}

impl SearchIndexConfig {
    /// Create a config with no page size limit (use with caution).
    pub fn unlimited() -> Self {
        Self {
            max_page_size: None,
        }
    }

    /// Create a config with a custom page size limit.
    pub fn with_max_page_size(max_page_size: usize) -> Self {
        Self {
            max_page_size: Some(max_page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_defaults() {
        let config = SearchBackendConfig::default();
        assert_eq!(config.url, "http://localhost:9200");
        assert_eq!(config.retry_delay(), Duration::from_secs(3));
        assert_eq!(config.raw_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_backend_partial_deserialize() {
        let config: SearchBackendConfig =
            serde_json::from_str(r#"{ "url": "http://search:9200" }"#).unwrap();
        assert_eq!(config.url, "http://search:9200");
        assert_eq!(config.retry_delay_secs, 3);
    }
}
