// src/models/mod.rs

//! Domain models for the topcharts application.
//!
//! This module contains all data structures used throughout the
//! application, organized by their primary purpose.

pub mod catalog;
mod config;
mod position;

// Re-export all public types
pub use catalog::{Genre, Pricing, StoreFront};
pub use config::{Config, FeedConfig};
pub use position::{AppsIndex, ChartEntry, Position, bundle_id_of};

/// A single fetch task: one chart identified by store front, pricing
/// tier and genre.
#[derive(Debug, Clone)]
pub struct ChartKey {
    pub store_front: StoreFront,
    pub pricing: Pricing,
    pub genre: Genre,
}

impl ChartKey {
    /// Relative storage path for this chart's snapshot.
    pub fn storage_key(&self) -> String {
        format!(
            "{}/{}/{}.json",
            self.store_front.country_code, self.pricing, self.genre.name
        )
    }

    /// Short human-readable label for logging.
    pub fn label(&self) -> String {
        format!(
            "{}:{}:{}",
            self.store_front.country_code, self.pricing, self.genre.name
        )
    }
}
