// src/lookup/mod.rs

//! Read-only lookup API over persisted chart data.
//!
//! Loads the aggregated `apps.json` index written by the update pipeline
//! and answers point queries about an app's current chart position(s).
//! Deliberately synchronous so consumers don't need an async runtime to
//! ask "is this app top?".

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::{AppsIndex, ChartEntry, Config, Position, Pricing};
use crate::storage::local::INDEX_FILE;

/// Filter over chart positions. Empty filter matches everything;
/// populated fields are AND-ed together.
#[derive(Debug, Clone, Default)]
pub struct PositionFilter {
    /// Restrict to one store front country code
    pub country_code: Option<String>,

    /// Restrict to one pricing tier
    pub pricing: Option<Pricing>,

    /// Restrict to one genre name
    pub genre: Option<String>,
}

impl PositionFilter {
    /// Filter matching every position.
    pub fn any() -> Self {
        Self::default()
    }

    /// Check whether a position passes the filter.
    pub fn matches(&self, position: &Position) -> bool {
        self.country_code
            .as_deref()
            .is_none_or(|c| position.country_code == c)
            && self.pricing.is_none_or(|p| position.pricing == p)
            && self.genre.as_deref().is_none_or(|g| position.genre == g)
    }
}

/// In-memory view of the aggregated apps index.
#[derive(Debug)]
pub struct ChartIndex {
    index: AppsIndex,
}

impl ChartIndex {
    /// Load the index from `{data_dir}/apps.json`.
    ///
    /// A missing index gets the run-update hint; any other read failure
    /// surfaces as the underlying I/O error.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self> {
        let path = data_dir.as_ref().join(INDEX_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::config(format!(
                    "Apps index not found at {}. Run 'update' first.",
                    path.display()
                )));
            }
            Err(e) => return Err(AppError::Io(e)),
        };

        Ok(Self {
            index: serde_json::from_str(&content)?,
        })
    }

    /// Build an index view from an already-loaded map.
    pub fn from_index(index: AppsIndex) -> Self {
        Self { index }
    }

    /// Get an app's chart position(s), filtered.
    ///
    /// Returns `None` for unknown bundle ids and when the filter removes
    /// every position.
    pub fn positions(&self, bundle_id: &str, filter: &PositionFilter) -> Option<Vec<&Position>> {
        let positions: Vec<&Position> = self
            .index
            .get(bundle_id)?
            .iter()
            .filter(|p| filter.matches(p))
            .collect();

        if positions.is_empty() {
            None
        } else {
            Some(positions)
        }
    }

    /// Check whether an app currently holds any matching top position.
    pub fn is_top(&self, bundle_id: &str, filter: &PositionFilter) -> bool {
        self.positions(bundle_id, filter).is_some()
    }

    /// Number of indexed bundle ids.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Load one chart snapshot from disk. A missing file yields an empty
/// chart.
pub fn load_chart(
    data_dir: impl AsRef<Path>,
    country_code: &str,
    pricing: Pricing,
    genre: &str,
) -> Result<Vec<ChartEntry>> {
    let path = chart_path(data_dir.as_ref(), country_code, pricing, genre);
    match fs::read(&path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(AppError::Io(e)),
    }
}

/// Load and concatenate every chart of a slice: a whole country, one
/// country+pricing, or one exact chart. Absent chart files are skipped.
///
/// `None` pricing/genre expand from the same configured catalog the
/// update side polls, so overridden tables stay consistent across the
/// write and read paths.
pub fn load_slice(
    data_dir: impl AsRef<Path>,
    config: &Config,
    country_code: &str,
    pricing: Option<Pricing>,
    genre: Option<&str>,
) -> Result<Vec<ChartEntry>> {
    let pricings = match pricing {
        Some(p) => vec![p],
        None => config.pricings.clone(),
    };
    let genres: Vec<String> = match genre {
        Some(g) => vec![g.to_string()],
        None => config.genres.iter().map(|g| g.name.clone()).collect(),
    };

    let mut entries = Vec::new();
    for p in &pricings {
        for g in &genres {
            entries.extend(load_chart(&data_dir, country_code, *p, g)?);
        }
    }
    Ok(entries)
}

fn chart_path(data_dir: &Path, country_code: &str, pricing: Pricing, genre: &str) -> PathBuf {
    data_dir
        .join(country_code)
        .join(pricing.as_str())
        .join(format!("{genre}.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn make_position(country: &str, pricing: Pricing, genre: &str, index: usize) -> Position {
        Position {
            country_code: country.to_string(),
            pricing,
            genre: genre.to_string(),
            index,
            total: 100,
        }
    }

    fn sample_index() -> ChartIndex {
        let mut index = AppsIndex::new();
        index.insert(
            "fr.lemonde.matin".to_string(),
            vec![
                make_position("fr", Pricing::Free, "news", 4),
                make_position("fr", Pricing::Free, "magazine_and_newspapers", 1),
                make_position("be", Pricing::Free, "news", 12),
            ],
        );
        index.insert(
            "com.example.paidgame".to_string(),
            vec![make_position("us", Pricing::Paid, "games", 9)],
        );
        ChartIndex::from_index(index)
    }

    #[test]
    fn test_positions_unfiltered() {
        let index = sample_index();
        let positions = index
            .positions("fr.lemonde.matin", &PositionFilter::any())
            .unwrap();
        assert_eq!(positions.len(), 3);
    }

    #[test]
    fn test_positions_filtered_by_country() {
        let index = sample_index();
        let filter = PositionFilter {
            country_code: Some("be".to_string()),
            ..PositionFilter::any()
        };

        let positions = index.positions("fr.lemonde.matin", &filter).unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].index, 12);
    }

    #[test]
    fn test_positions_filtered_to_nothing_is_none() {
        let index = sample_index();
        let filter = PositionFilter {
            country_code: Some("jp".to_string()),
            ..PositionFilter::any()
        };

        assert!(index.positions("fr.lemonde.matin", &filter).is_none());
    }

    #[test]
    fn test_positions_unknown_bundle_id() {
        let index = sample_index();
        assert!(index.positions("com.jomo.Jomo", &PositionFilter::any()).is_none());
    }

    #[test]
    fn test_is_top() {
        let index = sample_index();
        assert!(index.is_top("fr.lemonde.matin", &PositionFilter::any()));
        assert!(index.is_top(
            "com.example.paidgame",
            &PositionFilter {
                pricing: Some(Pricing::Paid),
                genre: Some("games".to_string()),
                ..PositionFilter::any()
            }
        ));
        assert!(!index.is_top("com.jomo.Jomo", &PositionFilter::any()));
    }

    #[test]
    fn test_combined_filter() {
        let index = sample_index();
        let filter = PositionFilter {
            country_code: Some("fr".to_string()),
            pricing: Some(Pricing::Free),
            genre: Some("news".to_string()),
        };

        let positions = index.positions("fr.lemonde.matin", &filter).unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].index, 4);
    }

    fn write_chart_file(dir: &Path, country: &str, pricing: &str, genre: &str, ids: &[&str]) {
        let path = dir.join(country).join(pricing);
        fs::create_dir_all(&path).unwrap();

        let total = ids.len();
        let entries: Vec<serde_json::Value> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                json!({
                    "$position": {
                        "country_code": country,
                        "pricing": pricing,
                        "genre": genre,
                        "index": i + 1,
                        "total": total
                    },
                    "id": { "attributes": { "im:bundleId": id } }
                })
            })
            .collect();

        fs::write(
            path.join(format!("{genre}.json")),
            serde_json::to_vec_pretty(&entries).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_load_chart_and_slices() {
        let tmp = TempDir::new().unwrap();
        let config = Config::default();
        write_chart_file(tmp.path(), "fr", "free", "book", &["com.a", "com.b"]);
        write_chart_file(tmp.path(), "fr", "free", "news", &["com.c"]);
        write_chart_file(tmp.path(), "fr", "paid", "book", &["com.d"]);

        let chart = load_chart(tmp.path(), "fr", Pricing::Free, "book").unwrap();
        assert_eq!(chart.len(), 2);
        assert_eq!(chart[0].bundle_id(), Some("com.a"));

        // Missing chart files read as empty, not as errors.
        let missing = load_chart(tmp.path(), "fr", Pricing::Paid, "news").unwrap();
        assert!(missing.is_empty());

        let free_slice = load_slice(tmp.path(), &config, "fr", Some(Pricing::Free), None).unwrap();
        assert_eq!(free_slice.len(), 3);

        let country_slice = load_slice(tmp.path(), &config, "fr", None, None).unwrap();
        assert_eq!(country_slice.len(), 4);

        let exact =
            load_slice(tmp.path(), &config, "fr", Some(Pricing::Paid), Some("book")).unwrap();
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].bundle_id(), Some("com.d"));
    }

    #[test]
    fn test_load_slice_honors_catalog_override() {
        let tmp = TempDir::new().unwrap();
        write_chart_file(tmp.path(), "fr", "free", "book", &["com.a"]);
        write_chart_file(tmp.path(), "fr", "free", "news", &["com.b"]);

        // A deployment polling only the book genre reads only that chart
        // back, even though other chart files are on disk.
        let config: Config = toml::from_str(
            r#"
            pricings = ["free"]

            [[genres]]
            id = 6018
            name = "book"
            "#,
        )
        .unwrap();

        let slice = load_slice(tmp.path(), &config, "fr", None, None).unwrap();
        assert_eq!(slice.len(), 1);
        assert_eq!(slice[0].bundle_id(), Some("com.a"));
    }

    #[test]
    fn test_index_load_missing_gets_hint() {
        let tmp = TempDir::new().unwrap();

        let err = ChartIndex::load(tmp.path()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("Run 'update' first"));
    }

    #[test]
    fn test_index_load_other_io_error_surfaces() {
        let tmp = TempDir::new().unwrap();
        // A directory where the index file should be: readable path
        // exists, but reading it is not a NotFound failure.
        fs::create_dir(tmp.path().join(INDEX_FILE)).unwrap();

        let err = ChartIndex::load(tmp.path()).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
