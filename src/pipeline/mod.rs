//! Pipeline entry points for chart updates.
//!
//! - `run_update`: Poll every configured chart and rebuild the apps index
//! - `diff`: Change detection between chart snapshots

pub mod diff;
pub mod update;

pub use diff::{ChartDiff, calculate_diff, chart_changed};
pub use update::{UpdateStatus, UpdateSummary, chart_keys, run_update};
