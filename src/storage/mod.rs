//! Storage abstractions for chart persistence.
//!
//! ## Directory Structure
//!
//! ```text
//! {root}/
//! ├── apps.json             # Aggregated bundle-id → positions index
//! ├── stats.json            # Last update run summary
//! └── {country_code}/
//!     └── {pricing}/
//!         └── {genre}.json  # One chart snapshot
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AppsIndex, ChartEntry, ChartKey};
use crate::pipeline::UpdateSummary;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for chart storage backends.
#[async_trait]
pub trait ChartStorage: Send + Sync {
    /// Load a chart snapshot. A missing file yields an empty chart.
    async fn load_chart(&self, key: &ChartKey) -> Result<Vec<ChartEntry>>;

    /// Overwrite a chart snapshot atomically.
    async fn write_chart(&self, key: &ChartKey, entries: &[ChartEntry]) -> Result<()>;

    /// Create the chart file with an empty snapshot if it does not exist.
    async fn ensure_chart(&self, key: &ChartKey) -> Result<()>;

    /// Load the aggregated apps index, if present.
    async fn load_index(&self) -> Result<Option<AppsIndex>>;

    /// Overwrite the aggregated apps index atomically.
    async fn write_index(&self, index: &AppsIndex) -> Result<()>;

    /// Record the summary of an update run.
    async fn write_summary(&self, summary: &UpdateSummary) -> Result<()>;
}
