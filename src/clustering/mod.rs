//! Season clustering
//!
//! K-means over scaled season features, relabelled into ranked tiers.

pub mod kmeans;
pub mod tiers;

pub use kmeans::{KMeans, KMeansFit};
pub use tiers::{Clustering, PerformanceClusterer, RankedSeason, TierSummary};

use crate::features::SeasonPerformance;
use crate::Result;

/// Assigns every season a tier rank
pub trait SeasonClusterer {
    fn cluster(&self, seasons: &[SeasonPerformance]) -> Result<Clustering>;
}
