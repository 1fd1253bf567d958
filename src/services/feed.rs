// src/services/feed.rs

//! Feed client service.
//!
//! Fetches one top-apps chart per request from the iTunes RSS/JSON
//! endpoint and normalizes the document into `ChartEntry` values.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{ChartEntry, ChartKey, Config, Position};

/// Source of chart data. The pipeline depends on this seam so it can be
/// driven without the network.
#[async_trait]
pub trait ChartFetcher: Send + Sync {
    /// Fetch the current entries of one chart.
    async fn fetch_chart(&self, key: &ChartKey) -> Result<Vec<ChartEntry>>;
}

/// Client for the top-applications feed.
pub struct FeedClient {
    config: Arc<Config>,
    client: Client,
}

impl FeedClient {
    /// Create a new feed client with the given configuration.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.feed.user_agent)
            .timeout(Duration::from_secs(config.feed.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Build the feed URL for one chart.
    pub fn chart_url(&self, key: &ChartKey) -> String {
        self.config
            .feed
            .endpoint
            .replace("{pricing}", key.pricing.as_str())
            .replace("{store_front}", &key.store_front.id.to_string())
            .replace("{limit}", &self.config.feed.limit.to_string())
            .replace("{genre}", &key.genre.id.to_string())
    }

}

#[async_trait]
impl ChartFetcher for FeedClient {
    /// Fetch one chart, retrying on non-success responses.
    ///
    /// A non-200 response is logged and retried after the configured
    /// fixed backoff, up to `max_retries` additional attempts.
    async fn fetch_chart(&self, key: &ChartKey) -> Result<Vec<ChartEntry>> {
        let url = url::Url::parse(&self.chart_url(key))?;
        let backoff = Duration::from_secs(self.config.feed.retry_backoff_secs);
        let attempts = self.config.feed.max_retries + 1;

        let mut last_status = 0;
        for attempt in 1..=attempts {
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();

            if status.is_success() {
                let text = response.text().await?;
                let body: Value = serde_json::from_str(&text)?;
                return Ok(entries_of(&body, key));
            }

            last_status = status.as_u16();
            log::warn!(
                "Got status {} for {} (attempt {}/{}), backing off {}s",
                status,
                key.label(),
                attempt,
                attempts,
                backoff.as_secs()
            );

            if attempt < attempts {
                tokio::time::sleep(backoff).await;
            }
        }

        Err(AppError::FeedStatus {
            context: key.label(),
            status: last_status,
            attempts,
        })
    }
}

/// Normalize a feed document into chart entries with positions.
///
/// Handles the document quirks of the upstream feed:
/// - missing `feed` or `feed.entry` yields an empty chart;
/// - a chart with a single app serves `entry` as an object, not an array.
fn entries_of(body: &Value, key: &ChartKey) -> Vec<ChartEntry> {
    let entry = body.get("feed").and_then(|feed| feed.get("entry"));

    let raw_entries: Vec<&Value> = match entry {
        Some(Value::Array(list)) => list.iter().collect(),
        Some(single @ Value::Object(_)) => vec![single],
        _ => Vec::new(),
    };

    let total = raw_entries.len();
    raw_entries
        .iter()
        .enumerate()
        .filter_map(|(i, value)| {
            let raw = value.as_object()?.clone();
            Some(ChartEntry {
                position: Position {
                    country_code: key.store_front.country_code.clone(),
                    pricing: key.pricing,
                    genre: key.genre.name.clone(),
                    index: i + 1,
                    total,
                },
                raw,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Genre, Pricing, StoreFront};
    use serde_json::json;

    fn sample_key() -> ChartKey {
        ChartKey {
            store_front: StoreFront {
                id: 143442,
                country_code: "fr".to_string(),
            },
            pricing: Pricing::Free,
            genre: Genre {
                id: 6018,
                name: "book".to_string(),
            },
        }
    }

    fn sample_client() -> FeedClient {
        FeedClient::new(Arc::new(Config::default())).unwrap()
    }

    #[test]
    fn test_chart_url() {
        let url = sample_client().chart_url(&sample_key());
        assert_eq!(
            url,
            "https://itunes.apple.com/WebObjects/MZStoreServices.woa/ws/RSS/\
             topfreeapplications/sf=143442/limit=100/genre=6018/json"
        );
    }

    #[test]
    fn test_entries_of_array() {
        let body = json!({
            "feed": {
                "entry": [
                    { "id": { "attributes": { "im:bundleId": "com.a" } } },
                    { "id": { "attributes": { "im:bundleId": "com.b" } } }
                ]
            }
        });

        let entries = entries_of(&body, &sample_key());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].position.index, 1);
        assert_eq!(entries[0].position.total, 2);
        assert_eq!(entries[1].position.index, 2);
        assert_eq!(entries[1].bundle_id(), Some("com.b"));
        assert_eq!(entries[0].position.country_code, "fr");
    }

    #[test]
    fn test_entries_of_single_object() {
        let body = json!({
            "feed": {
                "entry": { "id": { "attributes": { "im:bundleId": "com.only" } } }
            }
        });

        let entries = entries_of(&body, &sample_key());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].position.index, 1);
        assert_eq!(entries[0].position.total, 1);
    }

    #[test]
    fn test_entries_of_missing_entry() {
        let empty = json!({ "feed": {} });
        assert!(entries_of(&empty, &sample_key()).is_empty());

        let no_feed = json!({});
        assert!(entries_of(&no_feed, &sample_key()).is_empty());
    }
}
