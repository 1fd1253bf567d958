//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::catalog::{self, Genre, Pricing, StoreFront};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Feed endpoint and polling behavior settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Store fronts to poll (defaults to the built-in table)
    #[serde(default = "catalog::default_store_fronts")]
    pub store_fronts: Vec<StoreFront>,

    /// Genres to poll (defaults to the built-in table)
    #[serde(default = "catalog::default_genres")]
    pub genres: Vec<Genre>,

    /// Pricing tiers to poll (defaults to paid + free)
    #[serde(default = "catalog::default_pricings")]
    pub pricings: Vec<Pricing>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        if !path.as_ref().exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.feed.user_agent.trim().is_empty() {
            return Err(AppError::validation("feed.user_agent is empty"));
        }
        if self.feed.timeout_secs == 0 {
            return Err(AppError::validation("feed.timeout_secs must be > 0"));
        }
        if self.feed.limit == 0 {
            return Err(AppError::validation("feed.limit must be > 0"));
        }
        if !self.feed.endpoint.contains("{store_front}") {
            return Err(AppError::validation(
                "feed.endpoint must contain the {store_front} placeholder",
            ));
        }
        if self.store_fronts.is_empty() {
            return Err(AppError::validation("No store fronts defined"));
        }
        if self.genres.is_empty() {
            return Err(AppError::validation("No genres defined"));
        }
        if self.pricings.is_empty() {
            return Err(AppError::validation("No pricings defined"));
        }
        Ok(())
    }

    /// Number of charts one update run covers.
    pub fn chart_count(&self) -> usize {
        self.store_fronts.len() * self.pricings.len() * self.genres.len()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            store_fronts: catalog::default_store_fronts(),
            genres: catalog::default_genres(),
            pricings: catalog::default_pricings(),
        }
    }
}

/// Feed endpoint and polling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Endpoint template with `{pricing}`, `{store_front}`, `{limit}` and
    /// `{genre}` placeholders
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// Number of entries to request per chart
    #[serde(default = "defaults::limit")]
    pub limit: usize,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Fixed delay between sequential requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Fixed backoff after a non-success response in seconds
    #[serde(default = "defaults::retry_backoff")]
    pub retry_backoff_secs: u64,

    /// Maximum retries per chart before it is counted as failed
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
            limit: defaults::limit(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            retry_backoff_secs: defaults::retry_backoff(),
            max_retries: defaults::max_retries(),
        }
    }
}

mod defaults {
    pub fn endpoint() -> String {
        "https://itunes.apple.com/WebObjects/MZStoreServices.woa/ws/RSS/\
         top{pricing}applications/sf={store_front}/limit={limit}/genre={genre}/json"
            .into()
    }
    pub fn limit() -> usize {
        100
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; topcharts/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        500
    }
    pub fn retry_backoff() -> u64 {
        10
    }
    pub fn max_retries() -> u32 {
        3
    }
}
