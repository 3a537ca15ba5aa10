//! End-to-end season tier analysis
//!
//! Aggregates the selected team's seasons and clusters them, stopping early
//! when the team has no matches in range.

use crate::clustering::{Clustering, PerformanceClusterer, SeasonClusterer};
use crate::features::PerformanceCalculator;
use crate::{AnalysisConfig, Config, MatchRecord, MissingGoals, Result};

/// Outcome of an analysis run
#[derive(Debug, Clone)]
pub enum Analysis {
    /// The team played no matches in the season range
    NoData,
    Ranked(Clustering),
}

impl Analysis {
    pub fn clustering(&self) -> Option<&Clustering> {
        match self {
            Analysis::NoData => None,
            Analysis::Ranked(c) => Some(c),
        }
    }
}

/// Run the analysis with an explicit clusterer
pub fn analyze_with<C: SeasonClusterer>(
    matches: &[MatchRecord],
    analysis: &AnalysisConfig,
    missing_goals: MissingGoals,
    clusterer: &C,
) -> Result<Analysis> {
    let calculator = PerformanceCalculator::from_config(analysis, missing_goals);
    let seasons = calculator.calculate(matches);

    if seasons.is_empty() {
        log::info!(
            "No matches for {} between {} and {}",
            analysis.team,
            analysis.start_year,
            analysis.end_year
        );
        return Ok(Analysis::NoData);
    }

    log::info!("Clustering {} seasons for {}", seasons.len(), analysis.team);
    Ok(Analysis::Ranked(clusterer.cluster(&seasons)?))
}

/// Run the analysis with k-means settings from `config`
pub fn analyze(matches: &[MatchRecord], config: &Config) -> Result<Analysis> {
    let clusterer = PerformanceClusterer::from_config(&config.clustering);
    analyze_with(
        matches,
        &config.analysis,
        config.data.missing_goals,
        &clusterer,
    )
}
