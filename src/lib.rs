//! Season performance tiers
//!
//! Aggregates a team's historical match results per season and groups the
//! seasons into ranked performance tiers with k-means clustering.

pub mod clustering;
pub mod data;
pub mod features;
pub mod pipeline;
pub mod report;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single match row from the input file
///
/// Numeric fields are `None` when the source cell was empty or could not be
/// parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub home_team: String,
    pub away_team: String,
    pub season: Option<i32>,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
}

impl MatchRecord {
    /// Check if the given team played in this match
    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    /// Check if a team was playing at home
    pub fn is_home(&self, team: &str) -> Option<bool> {
        if team == self.home_team {
            Some(true)
        } else if team == self.away_team {
            Some(false)
        } else {
            None
        }
    }

    /// Goals scored by a specific team, if both the team and the value are known
    pub fn goals_for(&self, team: &str) -> Option<u32> {
        if self.is_home(team)? {
            self.home_goals
        } else {
            self.away_goals
        }
    }

    /// Goals conceded by a specific team
    pub fn goals_against(&self, team: &str) -> Option<u32> {
        if self.is_home(team)? {
            self.away_goals
        } else {
            self.home_goals
        }
    }

    /// Check if the given team won this match outright.
    ///
    /// Draws, losses and matches with a missing score are not wins.
    pub fn did_win(&self, team: &str) -> bool {
        match (self.goals_for(team), self.goals_against(team)) {
            (Some(scored), Some(conceded)) => scored > conceded,
            _ => false,
        }
    }

    /// True when both goal columns were parsed
    pub fn has_score(&self) -> bool {
        self.home_goals.is_some() && self.away_goals.is_some()
    }

    /// Check if the match belongs to a season in the inclusive range
    pub fn in_seasons(&self, start_year: i32, end_year: i32) -> bool {
        self.season
            .is_some_and(|season| season >= start_year && season <= end_year)
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum TiersError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Need at least {required} distinct seasons to form {required} tiers, found {distinct}")]
    InsufficientSeasons { distinct: usize, required: usize },

    #[error("Win rate is undefined for season {season} (no matches)")]
    UndefinedWinRate { season: i32 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Plot error: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, TiersError>;

/// How rows with a missing home or away goal count are treated during aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingGoals {
    /// Drop the row before aggregation
    #[default]
    Skip,
    /// Count the row as a played match with no victory and no goals
    CountAsPlayed,
}

impl fmt::Display for MissingGoals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingGoals::Skip => write!(f, "skip"),
            MissingGoals::CountAsPlayed => write!(f, "count_as_played"),
        }
    }
}

/// Application configuration loaded from tiers.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub data: DataConfig,
    pub clustering: ClusteringConfig,
    pub plot: PlotConfig,
}

/// Which team and seasons to analyse, and where the match data lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub file_path: String,
    pub team: String,
    pub start_year: i32,
    pub end_year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub delimiter: char,
    pub missing_goals: MissingGoals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    pub n_clusters: usize,
    pub seed: u64,
    pub n_init: usize,
    pub max_iter: usize,
    pub tolerance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    pub enabled: bool,
    pub output_path: String,
    pub width: u32,
    pub height: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            file_path: "BRA.csv".to_string(),
            team: "Flamengo RJ".to_string(),
            start_year: 2012,
            end_year: 2024,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            delimiter: ',',
            missing_goals: MissingGoals::Skip,
        }
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        ClusteringConfig {
            n_clusters: 5,
            seed: 42,
            n_init: 10,
            max_iter: 300,
            tolerance: 1e-4,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            enabled: true,
            output_path: "season_tiers.svg".to_string(),
            width: 1000,
            height: 700,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TiersError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| TiersError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TiersError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_match(home: &str, away: &str, hg: Option<u32>, ag: Option<u32>) -> MatchRecord {
        MatchRecord {
            home_team: home.to_string(),
            away_team: away.to_string(),
            season: Some(2020),
            home_goals: hg,
            away_goals: ag,
        }
    }

    #[test]
    fn test_goals_by_side() {
        let record = make_match("Flamengo RJ", "Santos", Some(3), Some(1));
        assert_eq!(record.goals_for("Flamengo RJ"), Some(3));
        assert_eq!(record.goals_against("Flamengo RJ"), Some(1));
        assert_eq!(record.goals_for("Santos"), Some(1));
        assert_eq!(record.goals_for("Palmeiras"), None);
    }

    #[test]
    fn test_did_win_requires_strict_majority() {
        assert!(make_match("A", "B", Some(2), Some(1)).did_win("A"));
        assert!(!make_match("A", "B", Some(2), Some(1)).did_win("B"));
        assert!(!make_match("A", "B", Some(1), Some(1)).did_win("A"));
        assert!(!make_match("A", "B", None, Some(0)).did_win("A"));
        assert!(make_match("A", "B", Some(0), Some(4)).did_win("B"));
    }

    #[test]
    fn test_in_seasons_inclusive() {
        let mut record = make_match("A", "B", Some(0), Some(0));
        assert!(record.in_seasons(2020, 2020));
        assert!(record.in_seasons(2018, 2020));
        assert!(!record.in_seasons(2021, 2024));
        record.season = None;
        assert!(!record.in_seasons(i32::MIN, i32::MAX));
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiers.toml");
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.analysis.team = "Santos".to_string();
        config.data.missing_goals = MissingGoals::CountAsPlayed;
        config.save(path).unwrap();

        let loaded = Config::load(path).unwrap();
        assert_eq!(loaded.analysis.team, "Santos");
        assert_eq!(loaded.data.missing_goals, MissingGoals::CountAsPlayed);
        assert_eq!(loaded.data.delimiter, ',');
        assert_eq!(loaded.clustering.n_clusters, 5);
    }

    #[test]
    fn test_config_missing_file() {
        let err = Config::load("/nonexistent/tiers.toml").unwrap_err();
        assert!(matches!(err, TiersError::Config(_)));
    }
}
