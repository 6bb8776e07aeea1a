// ─────────────────────────────────────────────────────────────────────
// Kuramoto Sync — Engine Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// Numerical integrator used inside each window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    /// Classic fixed-step RK4 with `max_step` substeps.
    Rk4,
    /// Adaptive Dormand–Prince RK5(4).
    DormandPrince,
}

/// ODE solver parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub kind: SolverKind,
    /// Largest substep for RK4; also caps the adaptive step.
    /// Default: 0.01.
    pub max_step: f64,
    /// Relative tolerance (adaptive only). Default: 1.49012e-8.
    pub rtol: f64,
    /// Absolute tolerance (adaptive only). Default: 1.49012e-8.
    pub atol: f64,
    /// Step-size floor; going below it is a solver failure.
    /// Default: 1e-12.
    pub min_step: f64,
    /// Internal step budget per output interval. Default: 500.
    pub max_steps: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            kind: SolverKind::DormandPrince,
            max_step: 0.01,
            rtol: 1.49012e-8,
            atol: 1.49012e-8,
            min_step: 1e-12,
            max_steps: 500,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> SyncResult<()> {
        if !(self.max_step > 0.0 && self.max_step.is_finite()) {
            return Err(SyncError::Config(format!(
                "solver.max_step must be > 0, got {}",
                self.max_step
            )));
        }
        if !(self.rtol > 0.0) || !(self.atol > 0.0) {
            return Err(SyncError::Config(format!(
                "solver tolerances must be > 0, got rtol={} atol={}",
                self.rtol, self.atol
            )));
        }
        if !(self.min_step > 0.0 && self.min_step < self.max_step) {
            return Err(SyncError::Config(format!(
                "solver.min_step must be in (0, max_step), got {}",
                self.min_step
            )));
        }
        if self.max_steps == 0 {
            return Err(SyncError::Config(
                "solver.max_steps must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Runtime configuration for the phase integrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Stop once the local order parameter reaches this value.
    /// Default: 0.99.
    pub order_threshold: f64,

    /// Simulated time integrated between order checks. Default: 0.1.
    pub window: f64,

    /// Spacing of the solver evaluation times inside a window.
    /// Default: 0.01.
    pub eval_step: f64,

    /// Window cap; `None` loops until convergence. Default: 10 000.
    pub max_windows: Option<u64>,

    /// Wall-clock budget in milliseconds. Default: none.
    pub deadline_ms: Option<u64>,

    /// Seed for the initial phases. Default: drawn from entropy.
    pub seed: Option<u64>,

    /// Keep a per-window log in the outcome. Default: false.
    pub record_history: bool,

    pub solver: SolverConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            order_threshold: 0.99,
            window: 0.1,
            eval_step: 0.01,
            max_windows: Some(10_000),
            deadline_ms: None,
            seed: None,
            record_history: false,
            solver: SolverConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> SyncResult<()> {
        if !(self.order_threshold > 0.0 && self.order_threshold <= 1.0) {
            return Err(SyncError::Config(format!(
                "order_threshold must be in (0, 1], got {}",
                self.order_threshold
            )));
        }
        if !(self.window > 0.0 && self.window.is_finite()) {
            return Err(SyncError::Config(format!(
                "window must be > 0, got {}",
                self.window
            )));
        }
        if !(self.eval_step > 0.0 && self.eval_step <= self.window) {
            return Err(SyncError::Config(format!(
                "eval_step must be in (0, window={}], got {}",
                self.window, self.eval_step
            )));
        }
        if self.max_windows == Some(0) {
            return Err(SyncError::Config(
                "max_windows must be > 0 (use null for no cap)".to_string(),
            ));
        }
        if self.deadline_ms == Some(0) {
            return Err(SyncError::Config(
                "deadline_ms must be > 0".to_string(),
            ));
        }
        self.solver.validate()
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> SyncResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SyncError::Config(format!("JSON parse error: {e}")))
    }
}

/// How converged phases become cluster labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ClusteringMethod {
    /// Greedy single-pass agglomeration; `None` uses half the phase std.
    GreedyTolerance { tolerance: Option<f64> },
    /// k-means over standardized phases.
    FixedK { k: usize },
}

impl Default for ClusteringMethod {
    fn default() -> Self {
        ClusteringMethod::GreedyTolerance { tolerance: None }
    }
}

/// Fixed-k centroid clustering parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    /// Independent k-means++ restarts; the lowest inertia wins. Default: 10.
    pub n_init: usize,
    /// Lloyd iterations per restart. Default: 300.
    pub max_iter: usize,
    /// Stop when no centroid moves more than this. Default: 1e-4.
    pub tol: f64,
    /// Seed for centroid seeding. Default: drawn from entropy.
    pub seed: Option<u64>,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            n_init: 10,
            max_iter: 300,
            tol: 1e-4,
            seed: None,
        }
    }
}

impl KMeansConfig {
    pub fn validate(&self) -> SyncResult<()> {
        if self.n_init == 0 || self.max_iter == 0 {
            return Err(SyncError::Config(format!(
                "kmeans n_init and max_iter must be >= 1, got {} and {}",
                self.n_init, self.max_iter
            )));
        }
        if !(self.tol >= 0.0) {
            return Err(SyncError::Config(format!(
                "kmeans tol must be >= 0, got {}",
                self.tol
            )));
        }
        Ok(())
    }
}

/// Full detection pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub simulation: SimulationConfig,
    pub method: ClusteringMethod,
    pub kmeans: KMeansConfig,
}

impl DetectionConfig {
    pub fn validate(&self) -> SyncResult<()> {
        self.simulation.validate()?;
        self.kmeans.validate()?;
        match self.method {
            ClusteringMethod::GreedyTolerance {
                tolerance: Some(tol),
            } if !(tol >= 0.0 && tol.is_finite()) => Err(SyncError::Config(format!(
                "tolerance must be finite and >= 0, got {tol}"
            ))),
            ClusteringMethod::FixedK { k: 0 } => {
                Err(SyncError::Config("k must be >= 1".to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> SyncResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SyncError::Config(format!("JSON parse error: {e}")))
    }
}
