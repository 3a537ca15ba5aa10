//! Per-season team statistics
//!
//! Filters match history down to one team and a range of seasons, then
//! aggregates results into one row per season.

use crate::{AnalysisConfig, MatchRecord, MissingGoals};
use std::collections::BTreeMap;

/// Aggregated results for one team in one season
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeasonPerformance {
    /// Season year
    pub season: i32,
    /// Matches won outright
    pub victories: u32,
    /// Total goals scored
    pub goals_scored: u64,
    /// Total goals conceded
    pub goals_conceded: u64,
    /// Matches counted
    pub matches: u32,
}

impl SeasonPerformance {
    /// Create new empty statistics for a season
    pub fn new(season: i32) -> Self {
        SeasonPerformance {
            season,
            ..Self::default()
        }
    }

    /// Update statistics with a match result.
    ///
    /// A missing goal value contributes nothing to the goal totals and the
    /// match cannot count as a victory.
    pub fn update(&mut self, record: &MatchRecord, team: &str) {
        self.matches += 1;
        self.goals_scored += u64::from(record.goals_for(team).unwrap_or(0));
        self.goals_conceded += u64::from(record.goals_against(team).unwrap_or(0));

        if record.did_win(team) {
            self.victories += 1;
        }
    }

    /// Victories per match, or `None` when no matches were counted
    pub fn win_rate(&self) -> Option<f64> {
        if self.matches == 0 {
            None
        } else {
            Some(f64::from(self.victories) / f64::from(self.matches))
        }
    }

    /// Goals scored minus goals conceded
    pub fn goal_difference(&self) -> i64 {
        self.goals_scored as i64 - self.goals_conceded as i64
    }
}

/// Computes season rows for one team over an inclusive season range
#[derive(Debug, Clone)]
pub struct PerformanceCalculator {
    team: String,
    start_year: i32,
    end_year: i32,
    missing_goals: MissingGoals,
}

impl PerformanceCalculator {
    pub fn new(team: impl Into<String>, start_year: i32, end_year: i32) -> Self {
        PerformanceCalculator {
            team: team.into(),
            start_year,
            end_year,
            missing_goals: MissingGoals::default(),
        }
    }

    pub fn from_config(analysis: &AnalysisConfig, missing_goals: MissingGoals) -> Self {
        Self::new(analysis.team.clone(), analysis.start_year, analysis.end_year)
            .with_missing_goals(missing_goals)
    }

    /// Set how unscored matches are treated
    pub fn with_missing_goals(mut self, policy: MissingGoals) -> Self {
        self.missing_goals = policy;
        self
    }

    /// Check whether a match belongs to the selected team and season range
    pub fn selects(&self, record: &MatchRecord) -> bool {
        record.involves(&self.team) && record.in_seasons(self.start_year, self.end_year)
    }

    /// Aggregate the selected matches into one row per season, ordered by season.
    ///
    /// Returns an empty vector when the team played no matches in range.
    pub fn calculate(&self, matches: &[MatchRecord]) -> Vec<SeasonPerformance> {
        let mut seasons: BTreeMap<i32, SeasonPerformance> = BTreeMap::new();
        let mut skipped = 0usize;

        for record in matches.iter().filter(|r| self.selects(r)) {
            let Some(season) = record.season else {
                continue;
            };

            if !record.has_score() && self.missing_goals == MissingGoals::Skip {
                skipped += 1;
                continue;
            }

            seasons
                .entry(season)
                .or_insert_with(|| SeasonPerformance::new(season))
                .update(record, &self.team);
        }

        if skipped > 0 {
            log::warn!(
                "Skipped {} matches for {} with a missing score",
                skipped,
                self.team
            );
        }

        log::debug!(
            "{}: {} seasons between {} and {} (missing goals: {})",
            self.team,
            seasons.len(),
            self.start_year,
            self.end_year,
            self.missing_goals
        );

        seasons.into_values().collect()
    }
}
