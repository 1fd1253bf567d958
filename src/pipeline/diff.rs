//! Change detection between chart snapshots.
//!
//! Decides whether a freshly fetched chart differs from the snapshot on
//! disk, and breaks the difference down by bundle identifier for
//! logging.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::ChartEntry;

/// Entry-level breakdown of a chart change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChartDiff {
    /// Bundle ids present in current but not in previous
    pub added: Vec<String>,
    /// Bundle ids present in previous but not in current
    pub removed: Vec<String>,
    /// Bundle ids present in both but at a different rank
    pub moved: Vec<String>,
}

impl ChartDiff {
    /// Check if there are any entry-level changes.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.moved.is_empty()
    }

    /// Get the total number of changes.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.moved.len()
    }
}

/// Whether the chart changed at all.
///
/// Full structural equality, including the raw feed fields. A feed-side
/// edit to an entry (new artwork URL, renamed app) counts as a change
/// even when the ranking itself is stable.
pub fn chart_changed(previous: &[ChartEntry], current: &[ChartEntry]) -> bool {
    previous != current
}

/// Calculate the entry-level diff between two snapshots of one chart.
///
/// Entries without a bundle identifier are ignored here; they still
/// participate in `chart_changed`.
pub fn calculate_diff(previous: &[ChartEntry], current: &[ChartEntry]) -> ChartDiff {
    let prev_ranks: HashMap<&str, usize> = previous
        .iter()
        .filter_map(|e| e.bundle_id().map(|id| (id, e.position.index)))
        .collect();

    let curr_ranks: HashMap<&str, usize> = current
        .iter()
        .filter_map(|e| e.bundle_id().map(|id| (id, e.position.index)))
        .collect();

    let prev_ids: HashSet<&str> = prev_ranks.keys().copied().collect();
    let curr_ids: HashSet<&str> = curr_ranks.keys().copied().collect();

    let mut added: Vec<String> = curr_ids
        .difference(&prev_ids)
        .map(|id| id.to_string())
        .collect();
    added.sort();

    let mut removed: Vec<String> = prev_ids
        .difference(&curr_ids)
        .map(|id| id.to_string())
        .collect();
    removed.sort();

    let mut moved: Vec<String> = prev_ids
        .intersection(&curr_ids)
        .filter(|id| prev_ranks[*id] != curr_ranks[*id])
        .map(|id| id.to_string())
        .collect();
    moved.sort();

    ChartDiff {
        added,
        removed,
        moved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Position, Pricing};
    use serde_json::json;

    fn make_entry(bundle_id: &str, index: usize, total: usize) -> ChartEntry {
        let raw = json!({
            "id": { "attributes": { "im:bundleId": bundle_id } }
        });

        ChartEntry {
            position: Position {
                country_code: "fr".to_string(),
                pricing: Pricing::Free,
                genre: "games".to_string(),
                index,
                total,
            },
            raw: raw.as_object().unwrap().clone(),
        }
    }

    #[test]
    fn test_no_changes() {
        let prev = vec![make_entry("com.a", 1, 2), make_entry("com.b", 2, 2)];
        let curr = prev.clone();

        assert!(!chart_changed(&prev, &curr));
        assert!(!calculate_diff(&prev, &curr).has_changes());
    }

    #[test]
    fn test_additions() {
        let prev = vec![make_entry("com.a", 1, 1)];
        let curr = vec![make_entry("com.a", 1, 2), make_entry("com.b", 2, 2)];

        let diff = calculate_diff(&prev, &curr);
        assert_eq!(diff.added, vec!["com.b"]);
        assert!(diff.removed.is_empty());
        assert!(chart_changed(&prev, &curr));
    }

    #[test]
    fn test_removals() {
        let prev = vec![make_entry("com.a", 1, 2), make_entry("com.b", 2, 2)];
        let curr = vec![make_entry("com.a", 1, 1)];

        let diff = calculate_diff(&prev, &curr);
        assert_eq!(diff.removed, vec!["com.b"]);
    }

    #[test]
    fn test_rank_moves() {
        let prev = vec![make_entry("com.a", 1, 2), make_entry("com.b", 2, 2)];
        let curr = vec![make_entry("com.b", 1, 2), make_entry("com.a", 2, 2)];

        let diff = calculate_diff(&prev, &curr);
        assert!(diff.added.is_empty());
        assert!(diff.removed.is_empty());
        assert_eq!(diff.moved, vec!["com.a", "com.b"]);
        assert_eq!(diff.change_count(), 2);
    }

    #[test]
    fn test_raw_field_edit_changes_chart_but_not_diff() {
        let prev = vec![make_entry("com.a", 1, 1)];
        let mut curr = prev.clone();
        curr[0]
            .raw
            .insert("im:name".to_string(), json!({ "label": "Renamed" }));

        assert!(chart_changed(&prev, &curr));
        assert!(!calculate_diff(&prev, &curr).has_changes());
    }

    #[test]
    fn test_empty_to_full() {
        let prev: Vec<ChartEntry> = vec![];
        let curr = vec![make_entry("com.a", 1, 1)];

        let diff = calculate_diff(&prev, &curr);
        assert_eq!(diff.added.len(), 1);
        assert!(diff.removed.is_empty());
    }
}
