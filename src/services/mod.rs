// src/services/mod.rs

//! Service layer for talking to the upstream feed.

mod feed;

pub use feed::{ChartFetcher, FeedClient};
