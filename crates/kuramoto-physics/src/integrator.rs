// ─────────────────────────────────────────────────────────────────────
// Kuramoto Sync — Phase Integrator
// ─────────────────────────────────────────────────────────────────────
//! Windowed integration loop:
//!   1. Draw θ uniformly in [0, 2π) (or take caller-supplied phases)
//!   2. Compute the local order parameter; stop if ≥ threshold
//!   3. Check cancellation, wall-clock deadline, and window cap
//!   4. Solve the vector field over one window, sampled every eval_step
//!   5. Keep the final sample, reduce mod 2π, advance t, go to 2

use std::f64::consts::TAU;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use kuramoto_types::phase::ensure_finite;
use kuramoto_types::{normalize_phases, Graph, SimulationConfig, SyncError, SyncResult};

use crate::order::{global_order_parameter, local_order_parameter};
use crate::solver::{solver_for, OdeSolver};
use crate::system::KuramotoSystem;

/// Cooperative cancellation flag, checked between windows.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Diagnostics for one order-parameter check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowLog {
    /// Windows integrated before this check.
    pub window: u64,
    /// Simulated time at this check.
    pub t: f64,
    pub local_order: f64,
    /// Kuramoto R ∈ [0, 1].
    pub r_global: f64,
}

/// Result of a converged run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// Final phases, each in [0, 2π).
    pub phases: Vec<f64>,
    /// Elapsed simulated time.
    pub t: f64,
    /// Windows integrated.
    pub windows: u64,
    /// Local order parameter of `phases`.
    pub order: f64,
    /// Per-check log; empty unless `record_history` is set.
    pub history: Vec<WindowLog>,
}

/// Drives the Kuramoto vector field until the local order parameter
/// reaches the configured threshold.
pub struct PhaseIntegrator {
    cfg: SimulationConfig,
    solver: Box<dyn OdeSolver>,
    cancel: Option<CancellationToken>,
}

impl PhaseIntegrator {
    pub fn new(config: SimulationConfig) -> SyncResult<Self> {
        config.validate()?;
        Ok(Self {
            solver: solver_for(&config.solver),
            cfg: config,
            cancel: None,
        })
    }

    /// Default parameters: threshold 0.99, window 0.1, eval_step 0.01,
    /// Dormand–Prince, 10 000-window cap.
    pub fn default_params() -> Self {
        let cfg = SimulationConfig::default();
        Self {
            solver: solver_for(&cfg.solver),
            cfg,
            cancel: None,
        }
    }

    /// Attach a cancellation token checked between windows.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.cfg
    }

    /// Uniform random phases in [0, 2π), seeded from the config when set.
    pub fn random_phases(&self, n: usize) -> Vec<f64> {
        let mut rng = match self.cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        (0..n).map(|_| rng.gen_range(0.0..TAU)).collect()
    }

    /// Integrate from random initial phases.
    pub fn run(&self, graph: &Graph) -> SyncResult<SimulationOutcome> {
        let initial = self.random_phases(graph.node_count());
        self.run_from(graph, initial)
    }

    /// Integrate from caller-supplied initial phases.
    pub fn run_from(&self, graph: &Graph, initial: Vec<f64>) -> SyncResult<SimulationOutcome> {
        if initial.len() != graph.node_count() {
            return Err(SyncError::Validation(format!(
                "initial phase length {} != node count {}",
                initial.len(),
                graph.node_count()
            )));
        }
        ensure_finite(&initial)?;

        let started = Instant::now();
        let system = KuramotoSystem::new(graph);
        let threshold = self.cfg.order_threshold;

        let mut phases = initial;
        normalize_phases(&mut phases);
        let mut windows: u64 = 0;
        let mut history = Vec::new();

        loop {
            let t = windows as f64 * self.cfg.window;
            let order = local_order_parameter(&phases, graph)?;
            log::debug!("window {windows}: t={t:.3} local_order={order:.6}");

            if self.cfg.record_history {
                history.push(WindowLog {
                    window: windows,
                    t,
                    local_order: order,
                    r_global: global_order_parameter(&phases),
                });
            }

            if order >= threshold {
                log::info!(
                    "converged at t={t:.2} after {windows} windows (local_order={order:.4})"
                );
                return Ok(SimulationOutcome {
                    phases,
                    t,
                    windows,
                    order,
                    history,
                });
            }

            if self.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
                log::warn!("simulation cancelled at t={t:.2}");
                return Err(SyncError::Cancelled);
            }

            if let Some(deadline_ms) = self.cfg.deadline_ms {
                if started.elapsed().as_millis() >= u128::from(deadline_ms) {
                    log::warn!("simulation deadline of {deadline_ms}ms exceeded at t={t:.2}");
                    return Err(SyncError::Timeout { deadline_ms });
                }
            }

            if self.cfg.max_windows.is_some_and(|cap| windows >= cap) {
                log::warn!(
                    "no convergence after {windows} windows: local_order={order:.4} < {threshold}"
                );
                return Err(SyncError::NonConvergence {
                    windows,
                    order,
                    threshold,
                });
            }

            let times = evaluation_times(t, self.cfg.window, self.cfg.eval_step);
            let mut states = self.solver.solve(&system, &phases, &times)?;
            phases = states.pop().ok_or_else(|| {
                SyncError::SimulationFailure("solver returned no states".to_string())
            })?;
            normalize_phases(&mut phases);
            windows += 1;
        }
    }
}

/// Sample times `t0, t0+step, …, t0+window`. The end point is always
/// included; a sample closer than half a step to it is dropped.
fn evaluation_times(t0: f64, window: f64, step: f64) -> Vec<f64> {
    let end = t0 + window;
    let mut times = vec![t0];
    let mut k = 1u64;
    loop {
        let t = t0 + k as f64 * step;
        if t >= end - 0.5 * step {
            break;
        }
        times.push(t);
        k += 1;
    }
    times.push(end);
    times
}

/// Converged phases for `graph` with default settings and the given
/// order threshold.
pub fn get_phase_value(graph: &Graph, order: f64) -> SyncResult<Vec<f64>> {
    let cfg = SimulationConfig {
        order_threshold: order,
        ..SimulationConfig::default()
    };
    Ok(PhaseIntegrator::new(cfg)?.run(graph)?.phases)
}
