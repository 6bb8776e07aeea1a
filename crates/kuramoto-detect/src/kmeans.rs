// ─────────────────────────────────────────────────────────────────────
// Kuramoto Sync — Fixed-k Clustering
// ─────────────────────────────────────────────────────────────────────
//! Lloyd's k-means over scalar values with k-means++ seeding.
//!
//! `n_init` independent restarts share one RNG stream; the run with the
//! lowest inertia wins. A cluster that loses all its points keeps its
//! previous centroid. Labels are renumbered by first appearance.

use kuramoto_types::{ClusterAssignment, KMeansConfig, SyncError, SyncResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    cfg: KMeansConfig,
}

impl KMeans {
    pub fn new(k: usize, cfg: KMeansConfig) -> SyncResult<Self> {
        if k == 0 {
            return Err(SyncError::Validation("k must be >= 1".to_string()));
        }
        cfg.validate()?;
        Ok(Self { k, cfg })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Cluster `values` into exactly `k` groups (fewer only if values repeat).
    pub fn fit_predict(&self, values: &[f64]) -> SyncResult<ClusterAssignment> {
        let n = values.len();
        if n == 0 {
            return Err(SyncError::Validation("no values to cluster".to_string()));
        }
        if self.k > n {
            return Err(SyncError::Validation(format!(
                "k={} exceeds the number of values ({n})",
                self.k
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SyncError::Validation(
                "values contain NaN or Inf".to_string(),
            ));
        }

        let mut rng = match self.cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut best_labels = vec![0; n];
        let mut best_inertia = f64::INFINITY;
        for _ in 0..self.cfg.n_init {
            let (labels, inertia) = self.single_run(values, &mut rng);
            if inertia < best_inertia {
                best_inertia = inertia;
                best_labels = labels;
            }
        }

        log::debug!(
            "kmeans k={} over {n} values: inertia={best_inertia:.6e}",
            self.k
        );
        Ok(ClusterAssignment::canonical(&best_labels))
    }

    fn single_run(&self, values: &[f64], rng: &mut StdRng) -> (Vec<usize>, f64) {
        let k = self.k;
        let mut centroids = plus_plus_init(values, k, rng);
        let mut labels = vec![0; values.len()];

        for _ in 0..self.cfg.max_iter {
            for (label, &v) in labels.iter_mut().zip(values) {
                *label = nearest(&centroids, v).0;
            }

            let mut sums = vec![0.0; k];
            let mut counts = vec![0usize; k];
            for (&label, &v) in labels.iter().zip(values) {
                sums[label] += v;
                counts[label] += 1;
            }

            let mut shift: f64 = 0.0;
            for c in 0..k {
                if counts[c] > 0 {
                    let next = sums[c] / counts[c] as f64;
                    shift = shift.max((next - centroids[c]).abs());
                    centroids[c] = next;
                }
            }
            if shift <= self.cfg.tol {
                break;
            }
        }

        let mut inertia = 0.0;
        for (label, &v) in labels.iter_mut().zip(values) {
            let (c, d2) = nearest(&centroids, v);
            *label = c;
            inertia += d2;
        }
        (labels, inertia)
    }
}

/// Index of, and squared distance to, the closest centroid.
#[inline]
fn nearest(centroids: &[f64], v: f64) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (c, &mu) in centroids.iter().enumerate() {
        let d2 = (v - mu) * (v - mu);
        if d2 < best.1 {
            best = (c, d2);
        }
    }
    best
}

fn plus_plus_init(values: &[f64], k: usize, rng: &mut StdRng) -> Vec<f64> {
    let n = values.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(values[rng.gen_range(0..n)]);

    while centroids.len() < k {
        let d2: Vec<f64> = values.iter().map(|&v| nearest(&centroids, v).1).collect();
        let total: f64 = d2.iter().sum();
        if total <= 0.0 {
            // Every value already coincides with a centroid.
            centroids.push(values[rng.gen_range(0..n)]);
            continue;
        }
        let target = rng.gen_range(0.0..total);
        let mut cumsum = 0.0;
        let mut pick = None;
        for (i, &w) in d2.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            cumsum += w;
            pick = Some(i);
            if target < cumsum {
                break;
            }
        }
        // `pick` is set because total > 0 means some weight is positive.
        centroids.push(values[pick.unwrap_or(0)]);
    }
    centroids
}
