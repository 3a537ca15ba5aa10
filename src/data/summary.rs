//! Dataset overview used by the `status` and `teams` commands

use crate::MatchRecord;
use std::collections::BTreeMap;

/// Aggregate view of a loaded match file
#[derive(Debug, Clone, Default)]
pub struct DatasetSummary {
    pub match_count: usize,
    /// Matches played per team name, home or away
    pub team_matches: BTreeMap<String, usize>,
    pub earliest_season: Option<i32>,
    pub latest_season: Option<i32>,
}

impl DatasetSummary {
    pub fn from_matches(matches: &[MatchRecord]) -> Self {
        let mut summary = DatasetSummary {
            match_count: matches.len(),
            ..Self::default()
        };

        for record in matches {
            for team in [&record.home_team, &record.away_team] {
                if !team.is_empty() {
                    *summary.team_matches.entry(team.clone()).or_insert(0) += 1;
                }
            }

            if let Some(season) = record.season {
                summary.earliest_season =
                    Some(summary.earliest_season.map_or(season, |s| s.min(season)));
                summary.latest_season =
                    Some(summary.latest_season.map_or(season, |s| s.max(season)));
            }
        }

        summary
    }

    pub fn team_count(&self) -> usize {
        self.team_matches.len()
    }

    /// Teams ordered by matches played, most first, then by name
    pub fn teams_by_matches(&self) -> Vec<(&str, usize)> {
        let mut teams: Vec<_> = self
            .team_matches
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        teams.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        teams
    }
}
