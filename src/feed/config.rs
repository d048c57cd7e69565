use serde::{Deserialize, Serialize};

/// Environment variable that overrides [`SearchConfig::api_key`].
pub const API_KEY_ENV: &str = "CATMAP_API_KEY";

/// Everything the feed pipeline needs, usually read from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub search: SearchConfig,
    pub store: StoreConfig,
    pub retry: RetryConfig,
}

impl FeedConfig {
    /// Applies `CATMAP_API_KEY` on top of the file contents.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                log::debug!("using search API key from {}", API_KEY_ENV);
                self.search.api_key = key;
            }
        }
        self
    }
}

/// Restaurant search endpoint and query shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub api_key: String,
    /// Search radius in metres
    pub radius: u32,
    pub sort: String,
    pub count: Option<u32>,
    /// Upstream cuisine ids to restrict the search to
    pub cuisines: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://developers.zomato.com/api/v2.1".to_string(),
            api_key: String::new(),
            radius: 10,
            sort: "real_distance".to_string(),
            count: None,
            cuisines: Vec::new(),
            timeout_secs: 10,
        }
    }
}

/// Realtime-database location of the shared records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database root, e.g. `https://<project>.firebaseio.com`
    pub base_url: String,
    /// Database secret or ID token, sent as `auth`
    pub auth: Option<String>,
    pub location_path: String,
    pub restaurants_path: String,
    /// How often the REST backend polls for location changes
    pub poll_interval_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            auth: None,
            location_path: "location".to_string(),
            restaurants_path: "restaurants".to_string(),
            poll_interval_ms: 2000,
        }
    }
}

/// Bounded retry for upstream calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub exponential_backoff: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 500,
            exponential_backoff: true,
        }
    }
}

impl RetryConfig {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn for_testing() -> Self {
        Self {
            max_retries: 2,
            retry_delay_ms: 1,
            exponential_backoff: false,
        }
    }
}
