//! Ranked performance tiers
//!
//! Seasons are clustered on (win rate, goal difference, goals scored) after
//! min-max scaling. Cluster ids are then replaced by a rank: 1 for the
//! cluster with the best mean win rate, ties broken by mean goal difference
//! and then mean goals scored.

use super::kmeans::KMeans;
use super::SeasonClusterer;
use crate::features::{MinMaxNormalization, SeasonPerformance};
use crate::{ClusteringConfig, Result, TiersError};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Number of clustering features: win rate, goal difference, goals scored
pub const FEATURE_DIM: usize = 3;

/// A season with its assigned tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedSeason {
    pub performance: SeasonPerformance,
    pub win_rate: f64,
    pub goal_difference: i64,
    /// 1 = best tier
    pub rank: usize,
}

impl RankedSeason {
    pub fn season(&self) -> i32 {
        self.performance.season
    }

    pub fn goals_scored(&self) -> u64 {
        self.performance.goals_scored
    }
}

/// Mean raw features of one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierSummary {
    pub rank: usize,
    pub seasons: usize,
    pub mean_win_rate: f64,
    pub mean_goal_difference: f64,
    pub mean_goals_scored: f64,
}

impl TierSummary {
    fn key(&self) -> [f64; FEATURE_DIM] {
        [
            self.mean_win_rate,
            self.mean_goal_difference,
            self.mean_goals_scored,
        ]
    }
}

/// Output of clustering: every input season with its rank, plus tier means
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Seasons in input order
    pub seasons: Vec<RankedSeason>,
    /// Tiers ordered best first
    pub tiers: Vec<TierSummary>,
    pub inertia: f64,
}

impl Clustering {
    /// Distinct ranks that have at least one season, ascending
    pub fn ranks_present(&self) -> Vec<usize> {
        self.seasons
            .iter()
            .map(|s| s.rank)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn seasons_in(&self, rank: usize) -> impl Iterator<Item = &RankedSeason> {
        self.seasons.iter().filter(move |s| s.rank == rank)
    }
}

/// Descending lexicographic order on feature means
fn compare_best_first(a: &[f64; FEATURE_DIM], b: &[f64; FEATURE_DIM]) -> Ordering {
    b.iter()
        .zip(a.iter())
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Clusters seasons into ranked tiers with k-means
#[derive(Debug, Clone)]
pub struct PerformanceClusterer {
    kmeans: KMeans,
}

impl PerformanceClusterer {
    pub fn new(kmeans: KMeans) -> Self {
        PerformanceClusterer { kmeans }
    }

    pub fn from_config(config: &ClusteringConfig) -> Self {
        Self::new(KMeans::from_config(config))
    }

    pub fn n_clusters(&self) -> usize {
        self.kmeans.n_clusters
    }

    fn features(seasons: &[SeasonPerformance]) -> Result<Vec<[f64; FEATURE_DIM]>> {
        seasons
            .iter()
            .map(|s| {
                let win_rate = s
                    .win_rate()
                    .ok_or(TiersError::UndefinedWinRate { season: s.season })?;
                Ok([
                    win_rate,
                    s.goal_difference() as f64,
                    s.goals_scored as f64,
                ])
            })
            .collect()
    }
}

impl Default for PerformanceClusterer {
    fn default() -> Self {
        Self::from_config(&ClusteringConfig::default())
    }
}

impl SeasonClusterer for PerformanceClusterer {
    fn cluster(&self, seasons: &[SeasonPerformance]) -> Result<Clustering> {
        let k = self.n_clusters();
        let features = Self::features(seasons)?;
        let (_, scaled) = MinMaxNormalization::fit_transform(&features);
        let fit = self.kmeans.fit(&scaled)?;

        // Raw feature means per cluster id
        let mut sums = vec![[0.0f64; FEATURE_DIM]; k];
        let mut counts = vec![0usize; k];
        for (row, &label) in features.iter().zip(fit.labels.iter()) {
            counts[label] += 1;
            for (s, v) in sums[label].iter_mut().zip(row.iter()) {
                *s += v;
            }
        }

        let mut tiers: Vec<(usize, TierSummary)> = (0..k)
            .filter(|&c| counts[c] > 0)
            .map(|c| {
                let n = counts[c] as f64;
                let summary = TierSummary {
                    rank: 0,
                    seasons: counts[c],
                    mean_win_rate: sums[c][0] / n,
                    mean_goal_difference: sums[c][1] / n,
                    mean_goals_scored: sums[c][2] / n,
                };
                (c, summary)
            })
            .collect();

        // Stable: equal means keep cluster id order
        tiers.sort_by(|(_, a), (_, b)| compare_best_first(&a.key(), &b.key()));

        let mut rank_of = vec![0usize; k];
        for (position, (cluster, summary)) in tiers.iter_mut().enumerate() {
            summary.rank = position + 1;
            rank_of[*cluster] = summary.rank;
        }

        let ranked = seasons
            .iter()
            .zip(features.iter())
            .zip(fit.labels.iter())
            .map(|((performance, row), &label)| RankedSeason {
                performance: *performance,
                win_rate: row[0],
                goal_difference: performance.goal_difference(),
                rank: rank_of[label],
            })
            .collect();

        for (_, tier) in &tiers {
            log::debug!(
                "Tier {}: {} seasons, win rate {:.3}, goal difference {:.1}, goals {:.1}",
                tier.rank,
                tier.seasons,
                tier.mean_win_rate,
                tier.mean_goal_difference,
                tier.mean_goals_scored
            );
        }

        Ok(Clustering {
            seasons: ranked,
            tiers: tiers.into_iter().map(|(_, t)| t).collect(),
            inertia: fit.inertia,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season(
        year: i32,
        victories: u32,
        matches: u32,
        scored: u64,
        conceded: u64,
    ) -> SeasonPerformance {
        SeasonPerformance {
            season: year,
            victories,
            goals_scored: scored,
            goals_conceded: conceded,
            matches,
        }
    }

    fn twelve_seasons() -> Vec<SeasonPerformance> {
        vec![
            season(2012, 12, 38, 39, 39),
            season(2013, 14, 38, 43, 46),
            season(2014, 14, 38, 46, 51),
            season(2015, 15, 38, 45, 53),
            season(2016, 20, 38, 52, 35),
            season(2017, 15, 38, 49, 38),
            season(2018, 21, 38, 59, 29),
            season(2019, 28, 38, 86, 37),
            season(2020, 21, 38, 68, 48),
            season(2021, 21, 38, 69, 36),
            season(2022, 18, 38, 60, 39),
            season(2023, 19, 38, 56, 42),
        ]
    }

    #[test]
    fn test_ranks_cover_all_tiers() {
        let clustering = PerformanceClusterer::default()
            .cluster(&twelve_seasons())
            .unwrap();

        assert_eq!(clustering.seasons.len(), 12);
        assert_eq!(clustering.ranks_present(), vec![1, 2, 3, 4, 5]);
        assert_eq!(clustering.tiers.len(), 5);
        let total: usize = clustering.tiers.iter().map(|t| t.seasons).sum();
        assert_eq!(total, 12);
    }

    #[test]
    fn test_tier_means_ordered_best_first() {
        let clustering = PerformanceClusterer::default()
            .cluster(&twelve_seasons())
            .unwrap();

        for pair in clustering.tiers.windows(2) {
            assert_eq!(pair[0].rank + 1, pair[1].rank);
            assert_ne!(
                compare_best_first(&pair[0].key(), &pair[1].key()),
                Ordering::Greater
            );
        }

        // Tier means agree with the seasons carrying that rank
        for tier in &clustering.tiers {
            let members: Vec<_> = clustering.seasons_in(tier.rank).collect();
            assert_eq!(members.len(), tier.seasons);
            let mean = members.iter().map(|s| s.win_rate).sum::<f64>() / members.len() as f64;
            assert!((mean - tier.mean_win_rate).abs() < 1e-12);
        }
    }

    #[test]
    fn test_perfect_season_outranks_winless_season() {
        let seasons = vec![
            season(2010, 10, 10, 30, 5),
            season(2011, 0, 10, 4, 25),
            season(2012, 5, 10, 15, 15),
            season(2013, 7, 10, 20, 10),
            season(2014, 3, 10, 10, 18),
            season(2015, 6, 10, 17, 14),
        ];

        let clustering = PerformanceClusterer::default().cluster(&seasons).unwrap();
        let perfect = clustering.seasons[0];
        let winless = clustering.seasons[1];
        assert_eq!(perfect.rank, 1);
        assert_eq!(winless.rank, 5);
        assert!(perfect.rank <= winless.rank);
    }

    #[test]
    fn test_five_distinct_seasons_rank_individually() {
        let seasons = vec![
            season(2020, 5, 10, 12, 12),
            season(2021, 9, 10, 25, 6),
            season(2022, 5, 10, 14, 10),
            season(2023, 2, 10, 8, 20),
            season(2024, 7, 10, 18, 11),
        ];

        let clustering = PerformanceClusterer::default().cluster(&seasons).unwrap();
        let ranks: Vec<usize> = clustering.seasons.iter().map(|s| s.rank).collect();
        // Equal win rates fall back to goal difference
        assert_eq!(ranks, vec![4, 1, 3, 5, 2]);
    }

    #[test]
    fn test_input_order_and_values_preserved() {
        let seasons = twelve_seasons();
        let clustering = PerformanceClusterer::default().cluster(&seasons).unwrap();

        for (input, ranked) in seasons.iter().zip(clustering.seasons.iter()) {
            assert_eq!(ranked.performance, *input);
            assert_eq!(ranked.goal_difference, input.goal_difference());
            assert_eq!(Some(ranked.win_rate), input.win_rate());
            assert!((1..=5).contains(&ranked.rank));
        }
    }

    #[test]
    fn test_too_few_seasons() {
        let seasons = &twelve_seasons()[..4];
        let err = PerformanceClusterer::default().cluster(seasons).unwrap_err();
        assert!(matches!(
            err,
            TiersError::InsufficientSeasons {
                distinct: 4,
                required: 5
            }
        ));
    }

    #[test]
    fn test_duplicate_seasons_count_once() {
        let mut seasons = twelve_seasons()[..3].to_vec();
        seasons.push(season(2030, 12, 38, 39, 39));
        seasons.push(season(2031, 12, 38, 39, 39));
        let err = PerformanceClusterer::default().cluster(&seasons).unwrap_err();
        assert!(matches!(err, TiersError::InsufficientSeasons { distinct: 3, .. }));
    }

    #[test]
    fn test_undefined_win_rate() {
        let mut seasons = twelve_seasons();
        seasons[3].matches = 0;
        seasons[3].victories = 0;
        let err = PerformanceClusterer::default().cluster(&seasons).unwrap_err();
        assert!(matches!(err, TiersError::UndefinedWinRate { season: 2015 }));
    }

    #[test]
    fn test_same_seed_same_ranks() {
        let seasons = twelve_seasons();
        let clusterer = PerformanceClusterer::default();
        let first = clusterer.cluster(&seasons).unwrap();
        let second = clusterer.cluster(&seasons).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compare_best_first() {
        assert_eq!(
            compare_best_first(&[0.6, 1.0, 5.0], &[0.5, 9.0, 9.0]),
            Ordering::Less
        );
        assert_eq!(
            compare_best_first(&[0.5, 1.0, 5.0], &[0.5, 2.0, 0.0]),
            Ordering::Greater
        );
        assert_eq!(
            compare_best_first(&[0.5, 2.0, 5.0], &[0.5, 2.0, 5.0]),
            Ordering::Equal
        );
    }
}
