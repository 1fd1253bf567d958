// src/lib.rs

//! topcharts Library
//!
//! Polls the iTunes top-applications feeds per store front, pricing tier
//! and genre, persists each chart as a JSON snapshot, and exposes a
//! read-only lookup API over the aggregated `apps.json` index.

pub mod error;
pub mod lookup;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
