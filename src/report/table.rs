//! Text, JSON and CSV renderings of ranked seasons

use crate::clustering::{Clustering, RankedSeason, TierSummary};
use crate::{AnalysisConfig, Result, TiersError};
use serde::Serialize;

/// Flat row for serialized output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonRow {
    pub season: i32,
    pub tier: usize,
    pub win_rate: f64,
    pub goal_difference: i64,
    pub goals_scored: u64,
    pub goals_conceded: u64,
    pub victories: u32,
    pub matches: u32,
}

impl From<&RankedSeason> for SeasonRow {
    fn from(s: &RankedSeason) -> Self {
        SeasonRow {
            season: s.season(),
            tier: s.rank,
            win_rate: s.win_rate,
            goal_difference: s.goal_difference,
            goals_scored: s.goals_scored(),
            goals_conceded: s.performance.goals_conceded,
            victories: s.performance.victories,
            matches: s.performance.matches,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    team: &'a str,
    start_year: i32,
    end_year: i32,
    seasons: Vec<SeasonRow>,
    tiers: &'a [TierSummary],
    inertia: f64,
}

/// Title naming the team and season range
pub fn title(analysis: &AnalysisConfig) -> String {
    format!(
        "Season tiers for {} ({}-{})",
        analysis.team, analysis.start_year, analysis.end_year
    )
}

/// Message shown when the team has no matches in range
pub fn no_data_message(analysis: &AnalysisConfig) -> String {
    format!(
        "No data found for team {} between {} and {}.",
        analysis.team, analysis.start_year, analysis.end_year
    )
}

/// Season table in the order the seasons are given
pub fn format_table(seasons: &[RankedSeason]) -> String {
    let mut out = format!(
        "{:>8} {:>6} {:>9} {:>9} {:>8}\n",
        "Season", "Tier", "WinRate", "GoalDiff", "Goals"
    );
    out.push_str(&"-".repeat(44));
    out.push('\n');

    for s in seasons {
        out.push_str(&format!(
            "{:>8} {:>6} {:>9.3} {:>+9} {:>8}\n",
            s.season(),
            s.rank,
            s.win_rate,
            s.goal_difference,
            s.goals_scored()
        ));
    }

    out
}

/// Mean features per tier, best tier first
pub fn format_tiers(tiers: &[TierSummary]) -> String {
    let mut out = String::from("Tier means:\n");
    for tier in tiers {
        out.push_str(&format!(
            "  Tier {}: {:>2} seasons  win rate {:.3}  goal diff {:>+7.1}  goals {:>6.1}\n",
            tier.rank,
            tier.seasons,
            tier.mean_win_rate,
            tier.mean_goal_difference,
            tier.mean_goals_scored
        ));
    }
    out
}

pub fn format_json(analysis: &AnalysisConfig, clustering: &Clustering) -> Result<String> {
    let report = JsonReport {
        team: &analysis.team,
        start_year: analysis.start_year,
        end_year: analysis.end_year,
        seasons: clustering.seasons.iter().map(SeasonRow::from).collect(),
        tiers: &clustering.tiers,
        inertia: clustering.inertia,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn format_csv(seasons: &[RankedSeason]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for s in seasons {
        writer.serialize(SeasonRow::from(s))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| TiersError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::SeasonPerformance;

    fn ranked(
        season: i32,
        rank: usize,
        victories: u32,
        scored: u64,
        conceded: u64,
    ) -> RankedSeason {
        let performance = SeasonPerformance {
            season,
            victories,
            goals_scored: scored,
            goals_conceded: conceded,
            matches: 38,
        };
        RankedSeason {
            performance,
            win_rate: performance.win_rate().unwrap(),
            goal_difference: performance.goal_difference(),
            rank,
        }
    }

    fn sample() -> Clustering {
        Clustering {
            seasons: vec![ranked(2019, 1, 28, 86, 37), ranked(2012, 2, 12, 39, 45)],
            tiers: vec![
                TierSummary {
                    rank: 1,
                    seasons: 1,
                    mean_win_rate: 28.0 / 38.0,
                    mean_goal_difference: 49.0,
                    mean_goals_scored: 86.0,
                },
                TierSummary {
                    rank: 2,
                    seasons: 1,
                    mean_win_rate: 12.0 / 38.0,
                    mean_goal_difference: -6.0,
                    mean_goals_scored: 39.0,
                },
            ],
            inertia: 0.0,
        }
    }

    #[test]
    fn test_format_table() {
        let table = format_table(&sample().seasons);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Season"));
        assert!(lines[0].contains("Tier"));
        assert!(lines[2].contains("2019"));
        assert!(lines[2].contains("0.737"));
        assert!(lines[2].contains("+49"));
        assert!(lines[3].contains("2012"));
        assert!(lines[3].contains("-6"));
    }

    #[test]
    fn test_format_tiers() {
        let text = format_tiers(&sample().tiers);
        assert!(text.contains("Tier 1"));
        assert!(text.contains("Tier 2"));
        assert!(text.contains("+49.0"));
    }

    #[test]
    fn test_format_json() {
        let analysis = AnalysisConfig::default();
        let json = format_json(&analysis, &sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["team"], "Flamengo RJ");
        assert_eq!(value["seasons"].as_array().unwrap().len(), 2);
        assert_eq!(value["seasons"][0]["season"], 2019);
        assert_eq!(value["seasons"][0]["tier"], 1);
        assert_eq!(value["tiers"][1]["rank"], 2);
        assert_eq!(value["inertia"], 0.0);
    }

    #[test]
    fn test_format_csv() {
        let csv = format_csv(&sample().seasons).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "season,tier,win_rate,goal_difference,goals_scored,goals_conceded,victories,matches"
        );
        assert!(lines.next().unwrap().starts_with("2019,1,"));
        assert!(lines.next().unwrap().starts_with("2012,2,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_messages() {
        let analysis = AnalysisConfig {
            file_path: "BRA.csv".to_string(),
            team: "Santos".to_string(),
            start_year: 2015,
            end_year: 2018,
        };
        assert_eq!(title(&analysis), "Season tiers for Santos (2015-2018)");
        assert!(no_data_message(&analysis).starts_with("No data found for team Santos"));
    }
}
