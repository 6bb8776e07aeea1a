// ─────────────────────────────────────────────────────────────────────
// Kuramoto Sync — Community Detector
// ─────────────────────────────────────────────────────────────────────
//! Graph → converged phases → cluster labels.
//!
//! The clustering strategy is chosen by `ClusteringMethod`. When every
//! phase coincides there is no spread to cluster on; the detector logs a
//! warning and puts every oscillator in cluster 0.

use serde::{Deserialize, Serialize};

use kuramoto_physics::{CancellationToken, PhaseIntegrator, SimulationOutcome};
use kuramoto_types::{
    ClusterAssignment, ClusteringMethod, DetectionConfig, Graph, KMeansConfig, SyncError,
    SyncResult,
};

use crate::ensemble::allocate_sync_ensembles;
use crate::kmeans::KMeans;
use crate::stats::{half_std_tolerance, standardize};

/// Result of one detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub assignment: ClusterAssignment,
    pub outcome: SimulationOutcome,
    /// Tolerance handed to the greedy allocator; `None` for fixed-k or
    /// the degenerate fallback.
    pub tolerance: Option<f64>,
}

pub struct KuramotoDetector {
    integrator: PhaseIntegrator,
    method: ClusteringMethod,
    kmeans: KMeansConfig,
}

impl KuramotoDetector {
    pub fn new(config: DetectionConfig) -> SyncResult<Self> {
        config.validate()?;
        Ok(Self {
            integrator: PhaseIntegrator::new(config.simulation)?,
            method: config.method,
            kmeans: config.kmeans,
        })
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.integrator = self.integrator.with_cancellation(token);
        self
    }

    pub fn method(&self) -> &ClusteringMethod {
        &self.method
    }

    /// Simulate from random phases, then cluster.
    pub fn detect(&self, graph: &Graph) -> SyncResult<Detection> {
        let outcome = self.integrator.run(graph)?;
        self.finish(outcome)
    }

    /// Simulate from the given initial phases, then cluster.
    pub fn detect_from(&self, graph: &Graph, initial: Vec<f64>) -> SyncResult<Detection> {
        let outcome = self.integrator.run_from(graph, initial)?;
        self.finish(outcome)
    }

    fn finish(&self, outcome: SimulationOutcome) -> SyncResult<Detection> {
        let (assignment, tolerance) = self.cluster(&outcome.phases)?;
        log::info!(
            "detected {} communities among {} oscillators after {} windows",
            assignment.n_clusters(),
            assignment.len(),
            outcome.windows
        );
        Ok(Detection {
            assignment,
            outcome,
            tolerance,
        })
    }

    /// Cluster already-converged phases with the configured method.
    pub fn detect_phases(&self, phases: &[f64]) -> SyncResult<ClusterAssignment> {
        self.cluster(phases).map(|(assignment, _)| assignment)
    }

    fn cluster(&self, phases: &[f64]) -> SyncResult<(ClusterAssignment, Option<f64>)> {
        match self.try_cluster(phases) {
            Err(SyncError::DegenerateClustering(msg)) => {
                log::warn!("{msg}; assigning all oscillators to one cluster");
                Ok((ClusterAssignment::single(phases.len()), None))
            }
            other => other,
        }
    }

    fn try_cluster(&self, phases: &[f64]) -> SyncResult<(ClusterAssignment, Option<f64>)> {
        match self.method {
            ClusteringMethod::GreedyTolerance { tolerance } => {
                let tol = match tolerance {
                    Some(tol) => tol,
                    None => half_std_tolerance(phases)?,
                };
                Ok((allocate_sync_ensembles(phases, tol)?, Some(tol)))
            }
            ClusteringMethod::FixedK { k } => {
                let z = standardize(phases)?;
                let kmeans = KMeans::new(k, self.kmeans.clone())?;
                Ok((kmeans.fit_predict(&z)?, None))
            }
        }
    }
}

/// Community labels for `graph` with default simulation settings.
///
/// `k = None` uses the greedy allocator at half the phase std; `Some(k)`
/// uses k-means on standardized phases.
pub fn kuramoto_detection(graph: &Graph, k: Option<usize>) -> SyncResult<ClusterAssignment> {
    let method = match k {
        Some(k) => ClusteringMethod::FixedK { k },
        None => ClusteringMethod::GreedyTolerance { tolerance: None },
    };
    let detector = KuramotoDetector::new(DetectionConfig {
        method,
        ..DetectionConfig::default()
    })?;
    Ok(detector.detect(graph)?.assignment)
}
