use crate::error::{AppError, Result};
use crate::ml::models::{ClusteringConfig, ClusteringOutcome};
use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Mini-batch k-means with k-means++ seeding.
///
/// Runs `n_init` independent initialisations and keeps the one with the lowest inertia. All
/// randomness derives from `ClusteringConfig::random_seed`, so equal inputs always produce
/// equal labels.
pub struct MiniBatchKMeans {
    config: ClusteringConfig,
}

impl MiniBatchKMeans {
    /// Create a new clusterer
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Partition the rows of `features`. When there are fewer rows than requested clusters,
    /// k is reduced to the row count and the outcome reports it.
    pub fn fit_predict(&self, features: &Array2<f64>) -> Result<ClusteringOutcome> {
        let n_samples = features.nrows();
        let n_features = features.ncols();
        let requested = self.config.n_clusters;

        if n_samples == 0 {
            return Err(AppError::Processing(
                "cannot cluster an empty feature matrix".to_string(),
            ));
        }
        if requested == 0 {
            return Err(AppError::Validation(
                "n_clusters must be at least 1".to_string(),
            ));
        }

        let k = requested.min(n_samples);

        if features.iter().all(|v| *v == 0.0) {
            debug!(n_samples, k, "All-zero feature matrix, assigning by row index");
            return Ok(ClusteringOutcome {
                labels: (0..n_samples).map(|i| i % k).collect(),
                n_clusters: k,
                requested_clusters: requested,
                centroids: Array2::zeros((k, n_features)),
                inertia: 0.0,
                iterations: 0,
                degenerate: true,
            });
        }

        // Each run draws its own seed from a master generator seeded with `random_seed`
        let mut seeds = StdRng::seed_from_u64(self.config.random_seed);
        let n_init = self.config.n_init.max(1);
        let mut best: Option<(Array2<f64>, Vec<usize>, f64, usize)> = None;

        for run in 0..n_init {
            let mut rng = StdRng::seed_from_u64(seeds.gen::<u64>());
            let (centroids, iterations) = self.run_once(features, k, &mut rng);

            let mut labels = Vec::with_capacity(n_samples);
            let mut inertia = 0.0;
            for row in features.rows() {
                let (label, distance) = nearest_centroid(&centroids, row);
                labels.push(label);
                inertia += distance;
            }

            debug!(run, iterations, inertia, "Mini-batch k-means run finished");

            // Strictly lower inertia wins, so ties keep the earlier run
            if best.as_ref().map_or(true, |(_, _, b, _)| inertia < *b) {
                best = Some((centroids, labels, inertia, iterations));
            }
        }

        let (centroids, labels, inertia, iterations) = best.ok_or_else(|| {
            AppError::Internal("k-means produced no run".to_string())
        })?;

        debug!(
            n_samples,
            n_features,
            k,
            n_init,
            iterations,
            inertia,
            "Mini-batch k-means finished"
        );

        Ok(ClusteringOutcome {
            labels,
            n_clusters: k,
            requested_clusters: requested,
            centroids,
            inertia,
            iterations,
            degenerate: false,
        })
    }

    /// One k-means++ initialisation followed by mini-batch updates until the centre shift
    /// drops to `tol` or `max_iter` is reached. Returns the centres and iterations run.
    fn run_once(
        &self,
        features: &Array2<f64>,
        k: usize,
        rng: &mut StdRng,
    ) -> (Array2<f64>, usize) {
        let n_samples = features.nrows();
        let mut centroids = Self::init_plus_plus(features, k, rng);
        let mut counts = vec![0usize; k];
        let batch_size = self.config.batch_size.clamp(1, n_samples);
        let mut iterations = 0;

        for _ in 0..self.config.max_iter {
            iterations += 1;
            let previous = centroids.clone();

            let batch = sample(rng, n_samples, batch_size).into_vec();
            let assignments: Vec<usize> = batch
                .iter()
                .map(|&i| nearest_centroid(&centroids, features.row(i)).0)
                .collect();

            // Per-centre learning rate 1 / (points seen so far)
            for (&i, &c) in batch.iter().zip(&assignments) {
                counts[c] += 1;
                let eta = 1.0 / counts[c] as f64;
                let delta = &features.row(i) - &centroids.row(c);
                centroids.row_mut(c).scaled_add(eta, &delta);
            }

            let shift: f64 = (&centroids - &previous).iter().map(|d| d * d).sum();
            if shift <= self.config.tol {
                break;
            }
        }

        (centroids, iterations)
    }

    /// k-means++ seeding: each further centre is drawn with probability proportional to its
    /// squared distance from the closest centre chosen so far.
    fn init_plus_plus(features: &Array2<f64>, k: usize, rng: &mut StdRng) -> Array2<f64> {
        let n_samples = features.nrows();
        let mut centroids = Array2::zeros((k, features.ncols()));
        let mut chosen = Vec::with_capacity(k);

        let first = rng.gen_range(0..n_samples);
        centroids.row_mut(0).assign(&features.row(first));
        chosen.push(first);

        let mut min_distances: Vec<f64> = features
            .rows()
            .into_iter()
            .map(|row| squared_distance(row, features.row(first)))
            .collect();

        for c in 1..k {
            let total: f64 = min_distances.iter().sum();

            let next = if total > 0.0 {
                let target = rng.gen::<f64>() * total;
                let mut cumulative = 0.0;
                let mut picked = None;
                for (i, d) in min_distances.iter().enumerate() {
                    cumulative += d;
                    if cumulative > target && *d > 0.0 {
                        picked = Some(i);
                        break;
                    }
                }
                picked.or_else(|| min_distances.iter().rposition(|d| *d > 0.0))
            } else {
                None
            };

            // Every remaining row coincides with a centre: take the first unused row
            let next = next
                .or_else(|| (0..n_samples).find(|i| !chosen.contains(i)))
                .unwrap_or(first);

            centroids.row_mut(c).assign(&features.row(next));
            chosen.push(next);

            for (i, row) in features.rows().into_iter().enumerate() {
                let d = squared_distance(row, features.row(next));
                if d < min_distances[i] {
                    min_distances[i] = d;
                }
            }
        }

        centroids
    }
}

/// Index of and squared distance to the closest centroid; ties go to the lower index
fn nearest_centroid(centroids: &Array2<f64>, row: ArrayView1<f64>) -> (usize, f64) {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (c, centroid) in centroids.rows().into_iter().enumerate() {
        let distance = squared_distance(row, centroid);
        if distance < best_distance {
            best = c;
            best_distance = distance;
        }
    }
    (best, best_distance)
}

fn squared_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}
