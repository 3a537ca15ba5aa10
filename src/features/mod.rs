//! Feature extraction
//!
//! Turns raw match rows into per-season statistics and scaled feature vectors.

pub mod scaling;
pub mod season_stats;

pub use scaling::MinMaxNormalization;
pub use season_stats::{PerformanceCalculator, SeasonPerformance};
