//! Chart position and snapshot entry data structures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::Pricing;

/// Aggregated index mapping bundle identifiers to every chart position
/// the app currently holds. Persisted as `apps.json`.
///
/// A `BTreeMap` keeps the written file deterministic.
pub type AppsIndex = BTreeMap<String, Vec<Position>>;

/// An app's position within one chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Position {
    /// Store front country code
    pub country_code: String,

    /// Pricing tier of the chart
    pub pricing: Pricing,

    /// Genre name of the chart
    pub genre: String,

    /// Rank within the chart, 1-based
    pub index: usize,

    /// Total number of entries in the chart
    pub total: usize,
}

/// One entry of a persisted chart snapshot.
///
/// The position is stored under the `$position` key; every other field of
/// the upstream feed entry is carried verbatim so that snapshots
/// round-trip and change detection sees feed-side edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartEntry {
    /// Computed chart position
    #[serde(rename = "$position")]
    pub position: Position,

    /// Raw feed entry fields, passed through untouched
    #[serde(flatten)]
    pub raw: Map<String, Value>,
}

impl ChartEntry {
    /// Bundle identifier of the app, read from the raw feed entry.
    ///
    /// The feed nests it as `id.attributes."im:bundleId"`.
    pub fn bundle_id(&self) -> Option<&str> {
        bundle_id_of(&self.raw)
    }
}

/// Extract the bundle identifier from a raw feed entry object.
pub fn bundle_id_of(entry: &Map<String, Value>) -> Option<&str> {
    entry
        .get("id")?
        .get("attributes")?
        .get("im:bundleId")?
        .as_str()
}
