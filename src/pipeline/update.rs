// src/pipeline/update.rs

//! Sequential chart update pipeline.
//!
//! Walks the cartesian product of store fronts × pricing tiers × genres,
//! fetching each chart with a fixed delay between requests to stay under
//! the upstream rate limit. Each chart is rewritten only when it changed,
//! and every fetched position is accumulated into the `apps.json` index.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{AppsIndex, ChartEntry, ChartKey, Config};
use crate::pipeline::{calculate_diff, chart_changed};
use crate::services::ChartFetcher;
use crate::storage::ChartStorage;

/// Overall status of an update run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    /// At least one chart was rewritten
    Updated,
    /// Every chart matched its previous snapshot
    NoneUpdated,
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateStatus::Updated => f.write_str("updated"),
            UpdateStatus::NoneUpdated => f.write_str("none_updated"),
        }
    }
}

/// Summary of an update run, persisted as `stats.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub status: UpdateStatus,
    pub charts_total: usize,
    pub charts_changed: usize,
    pub charts_failed: usize,
    pub entries_indexed: usize,
    pub apps_indexed: usize,
}

/// Decision for one chart after comparing snapshots.
#[derive(Debug)]
struct ChartOutcome {
    /// Whether the fetched chart differs from the snapshot on disk
    changed: bool,
    /// Whether the snapshot should be rewritten
    write: bool,
    /// The entries that now represent the chart (for index aggregation)
    kept: Vec<ChartEntry>,
}

/// Decide what to do with a freshly fetched chart.
///
/// A snapshot is rewritten only when the chart changed and the fetch is
/// non-empty; the feed occasionally serves empty documents for fringe
/// charts and those must never clobber an existing snapshot. An empty
/// fetch keeps the previous entries representing the chart.
fn reconcile_chart(previous: Vec<ChartEntry>, current: Vec<ChartEntry>) -> ChartOutcome {
    let changed = chart_changed(&previous, &current);
    let write = changed && !current.is_empty();
    let kept = if current.is_empty() { previous } else { current };

    ChartOutcome {
        changed,
        write,
        kept,
    }
}

/// Build the full task list: store fronts × pricing tiers × genres.
pub fn chart_keys(config: &Config) -> Vec<ChartKey> {
    let mut keys = Vec::with_capacity(config.chart_count());
    for store_front in &config.store_fronts {
        for pricing in &config.pricings {
            for genre in &config.genres {
                keys.push(ChartKey {
                    store_front: store_front.clone(),
                    pricing: *pricing,
                    genre: genre.clone(),
                });
            }
        }
    }
    keys
}

/// Run the full update: poll every chart and rebuild the apps index.
///
/// A chart whose retries are exhausted is counted as failed and the run
/// continues; its previous snapshot keeps representing it in the index.
pub async fn run_update(
    config: &Config,
    fetcher: &dyn ChartFetcher,
    storage: &dyn ChartStorage,
) -> Result<UpdateSummary> {
    let started_at = Utc::now();
    let keys = chart_keys(config);
    let delay = Duration::from_millis(config.feed.request_delay_ms);

    log::info!("Updating {} charts...", keys.len());

    let mut index = AppsIndex::new();
    let mut entries_indexed = 0;
    let mut charts_changed = 0;
    let mut charts_failed = 0;

    for (i, key) in keys.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match update_chart(key, fetcher, storage).await {
            Ok((changed, entries)) => {
                if changed {
                    charts_changed += 1;
                }
                entries_indexed += index_entries(&mut index, &entries);
            }
            Err(error) => {
                charts_failed += 1;
                log::error!("Failed to update chart {}: {}", key.label(), error);

                // Keep the previous snapshot's positions in the index so a
                // transient upstream failure does not delist its apps.
                let previous = storage.load_chart(key).await?;
                entries_indexed += index_entries(&mut index, &previous);
            }
        }
    }

    storage.write_index(&index).await?;
    log::info!("Apps index written: {} bundle ids", index.len());

    let status = if charts_changed > 0 {
        UpdateStatus::Updated
    } else {
        UpdateStatus::NoneUpdated
    };

    let summary = UpdateSummary {
        started_at,
        finished_at: Utc::now(),
        status,
        charts_total: keys.len(),
        charts_changed,
        charts_failed,
        entries_indexed,
        apps_indexed: index.len(),
    };
    storage.write_summary(&summary).await?;

    log::info!(
        "Update complete: {}/{} charts changed, {} failed",
        summary.charts_changed,
        summary.charts_total,
        summary.charts_failed
    );

    Ok(summary)
}

/// Update a single chart snapshot.
///
/// Returns whether the chart changed, plus the entries that now
/// represent it (for index aggregation).
async fn update_chart(
    key: &ChartKey,
    fetcher: &dyn ChartFetcher,
    storage: &dyn ChartStorage,
) -> Result<(bool, Vec<ChartEntry>)> {
    log::debug!("update_chart:{}", key.label());

    storage.ensure_chart(key).await?;
    let previous = storage.load_chart(key).await?;
    let current = fetcher.fetch_chart(key).await?;

    let outcome = reconcile_chart(previous.clone(), current);

    if outcome.write {
        storage.write_chart(key, &outcome.kept).await?;

        let diff = calculate_diff(&previous, &outcome.kept);
        log::info!(
            "Chart {} changed: {} added, {} removed, {} moved",
            key.label(),
            diff.added.len(),
            diff.removed.len(),
            diff.moved.len()
        );
    }

    Ok((outcome.changed, outcome.kept))
}

/// Accumulate entries into the apps index; returns how many carried a
/// bundle identifier.
fn index_entries(index: &mut AppsIndex, entries: &[ChartEntry]) -> usize {
    let mut indexed = 0;
    for entry in entries {
        let Some(bundle_id) = entry.bundle_id() else {
            log::debug!(
                "Entry without bundle id at {}:{}",
                entry.position.genre,
                entry.position.index
            );
            continue;
        };

        index
            .entry(bundle_id.to_string())
            .or_default()
            .push(entry.position.clone());
        indexed += 1;
    }
    indexed
}
