//! Provider and aggregator configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable holding the provider access credential.
pub const API_KEY_ENV: &str = "GIPHY_API_KEY";

/// Configuration for the GIPHY provider client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Access credential. Requests are refused while this is absent.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of the gifs API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Language passed to keyword search.
    #[serde(default = "default_lang")]
    pub lang: String,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_base_url() -> String {
    "https://api.giphy.com/v1/gifs".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            lang: default_lang(),
            timeout: default_timeout(),
        }
    }
}

impl ProviderConfig {
    /// Creates a configuration with the credential taken from `GIPHY_API_KEY`.
    pub fn from_env() -> Self {
        Self::default().with_api_key_opt(std::env::var(API_KEY_ENV).ok())
    }

    /// Sets the access credential.
    pub fn with_api_key(self, api_key: impl Into<String>) -> Self {
        self.with_api_key_opt(Some(api_key.into()))
    }

    fn with_api_key_opt(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    /// Sets the base URL (useful for staging or local stubs).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the search language.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Sets the HTTP timeout in seconds.
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the HTTP timeout as a `Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Returns the credential if one is configured.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

/// Pagination and sampling parameters for the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Items requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Total fetch attempts per continuation when pages are all duplicates.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Number of items in the initial sample.
    #[serde(default = "default_initial_sample")]
    pub initial_sample: usize,
}

fn default_page_size() -> usize {
    20
}

fn default_max_attempts() -> usize {
    3
}

fn default_initial_sample() -> usize {
    3
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_attempts: default_max_attempts(),
            initial_sample: default_initial_sample(),
        }
    }
}
