//! Seeded k-means with k-means++ initialization and restarts

use crate::{ClusteringConfig, Result, TiersError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// K-means settings
#[derive(Debug, Clone)]
pub struct KMeans {
    pub n_clusters: usize,
    /// Independent initializations; the lowest-inertia run is kept
    pub n_init: usize,
    pub max_iter: usize,
    /// Convergence threshold relative to the mean feature variance
    pub tolerance: f64,
    pub seed: u64,
}

/// Result of a k-means fit
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Cluster index for each input point
    pub labels: Vec<usize>,
    /// Within-cluster sum of squared distances
    pub inertia: f64,
    /// Lloyd iterations used by the winning run
    pub n_iter: usize,
}

impl KMeans {
    pub fn new(n_clusters: usize) -> Self {
        KMeans {
            n_clusters,
            ..Self::from_config(&ClusteringConfig::default())
        }
    }

    pub fn from_config(config: &ClusteringConfig) -> Self {
        KMeans {
            n_clusters: config.n_clusters,
            n_init: config.n_init,
            max_iter: config.max_iter,
            tolerance: config.tolerance,
            seed: config.seed,
        }
    }

    /// Partition `points` into `n_clusters` groups.
    ///
    /// Fails when there are fewer distinct points than clusters.
    pub fn fit<const D: usize>(&self, points: &[[f64; D]]) -> Result<KMeansFit> {
        if self.n_clusters == 0 {
            return Err(TiersError::Config("n_clusters must be at least 1".to_string()));
        }
        if self.n_init == 0 {
            return Err(TiersError::Config("n_init must be at least 1".to_string()));
        }

        let distinct = count_distinct(points);
        if distinct < self.n_clusters {
            return Err(TiersError::InsufficientSeasons {
                distinct,
                required: self.n_clusters,
            });
        }

        let tol = self.tolerance * mean_variance(points);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<KMeansFit> = None;

        for run in 0..self.n_init {
            let initial = kmeans_plus_plus(points, self.n_clusters, &mut rng);
            let fit = lloyd(points, initial, self.max_iter.max(1), tol);
            log::debug!(
                "k-means run {}: inertia {:.6} after {} iterations",
                run + 1,
                fit.inertia,
                fit.n_iter
            );

            if best.as_ref().map_or(true, |b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }

        best.ok_or_else(|| TiersError::Config("k-means produced no runs".to_string()))
    }
}

pub fn squared_distance<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Number of distinct points, compared bitwise
pub fn count_distinct<const D: usize>(points: &[[f64; D]]) -> usize {
    let mut keys: Vec<[u64; D]> = points
        .iter()
        .map(|p| {
            let mut key = [0u64; D];
            for (k, v) in key.iter_mut().zip(p.iter()) {
                // -0.0 and 0.0 are the same point
                *k = (v + 0.0).to_bits();
            }
            key
        })
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys.len()
}

fn mean_variance<const D: usize>(points: &[[f64; D]]) -> f64 {
    if points.is_empty() || D == 0 {
        return 0.0;
    }
    let n = points.len() as f64;
    let mut total = 0.0;
    for j in 0..D {
        let mean = points.iter().map(|p| p[j]).sum::<f64>() / n;
        total += points.iter().map(|p| (p[j] - mean).powi(2)).sum::<f64>() / n;
    }
    total / D as f64
}

/// Choose initial centroids with probability proportional to squared
/// distance from the centroids picked so far.
fn kmeans_plus_plus<const D: usize>(
    points: &[[f64; D]],
    k: usize,
    rng: &mut StdRng,
) -> Vec<[f64; D]> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..n)]);

    let mut min_distances: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = min_distances.iter().sum();
        if total <= 0.0 {
            break;
        }

        let target = rng.gen::<f64>() * total;
        let mut cumulative = 0.0;
        let mut chosen = None;
        for (i, &d) in min_distances.iter().enumerate() {
            if d <= 0.0 {
                continue;
            }
            chosen = Some(i);
            cumulative += d;
            if cumulative > target {
                break;
            }
        }

        let Some(idx) = chosen else {
            break;
        };
        let centroid = points[idx];
        centroids.push(centroid);

        for (dist, p) in min_distances.iter_mut().zip(points.iter()) {
            *dist = dist.min(squared_distance(p, &centroid));
        }
    }

    centroids
}

/// Assign each point to its nearest centroid. Returns true if any label changed.
fn assign<const D: usize>(
    points: &[[f64; D]],
    centroids: &[[f64; D]],
    labels: &mut [usize],
) -> bool {
    let mut changed = false;
    for (label, p) in labels.iter_mut().zip(points.iter()) {
        let nearest = centroids
            .iter()
            .enumerate()
            .map(|(c, centroid)| (c, squared_distance(p, centroid)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(c, _)| c)
            .unwrap_or(0);
        if *label != nearest {
            *label = nearest;
            changed = true;
        }
    }
    changed
}

/// Move the farthest points of populated clusters into empty ones
fn relocate_empty<const D: usize>(
    points: &[[f64; D]],
    centroids: &[[f64; D]],
    labels: &mut [usize],
) {
    let k = centroids.len();
    let mut counts = vec![0usize; k];
    for &label in labels.iter() {
        counts[label] += 1;
    }

    for cluster in 0..k {
        if counts[cluster] > 0 {
            continue;
        }

        let farthest = (0..points.len())
            .filter(|&i| counts[labels[i]] > 1)
            .max_by(|&a, &b| {
                let da = squared_distance(&points[a], &centroids[labels[a]]);
                let db = squared_distance(&points[b], &centroids[labels[b]]);
                da.total_cmp(&db)
            });

        if let Some(i) = farthest {
            counts[labels[i]] -= 1;
            labels[i] = cluster;
            counts[cluster] = 1;
        }
    }
}

/// Mean of the points in each cluster. Empty clusters keep their previous centroid.
fn compute_centroids<const D: usize>(
    points: &[[f64; D]],
    labels: &[usize],
    previous: &[[f64; D]],
) -> Vec<[f64; D]> {
    let k = previous.len();
    let mut sums = vec![[0.0f64; D]; k];
    let mut counts = vec![0usize; k];

    for (p, &label) in points.iter().zip(labels.iter()) {
        counts[label] += 1;
        for (s, v) in sums[label].iter_mut().zip(p.iter()) {
            *s += v;
        }
    }

    sums.into_iter()
        .zip(counts)
        .zip(previous.iter())
        .map(|((mut sum, count), prev)| {
            if count == 0 {
                return *prev;
            }
            for v in sum.iter_mut() {
                *v /= count as f64;
            }
            sum
        })
        .collect()
}

fn lloyd<const D: usize>(
    points: &[[f64; D]],
    mut centroids: Vec<[f64; D]>,
    max_iter: usize,
    tol: f64,
) -> KMeansFit {
    let mut labels = vec![usize::MAX; points.len()];
    assign(points, &centroids, &mut labels);

    let mut n_iter = 0;
    for _ in 0..max_iter {
        n_iter += 1;
        relocate_empty(points, &centroids, &mut labels);

        let updated = compute_centroids(points, &labels, &centroids);
        let shift: f64 = centroids
            .iter()
            .zip(updated.iter())
            .map(|(a, b)| squared_distance(a, b))
            .sum();
        centroids = updated;

        let changed = assign(points, &centroids, &mut labels);
        if !changed || shift <= tol {
            break;
        }
    }

    relocate_empty(points, &centroids, &mut labels);
    let centroids = compute_centroids(points, &labels, &centroids);
    let inertia = points
        .iter()
        .zip(labels.iter())
        .map(|(p, &label)| squared_distance(p, &centroids[label]))
        .sum();

    KMeansFit {
        labels,
        inertia,
        n_iter,
    }
}
