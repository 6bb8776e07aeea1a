// ─────────────────────────────────────────────────────────────────────
// Kuramoto Sync — ODE System Generator
// ─────────────────────────────────────────────────────────────────────
//! Vector field of the graph-coupled Kuramoto model with zero natural
//! frequencies:
//!
//!   dθ_i/dt = (1/N) Σ_{j ∈ N(i)} sin(θ_j − θ_i)
//!
//! The coupling is normalized by the total oscillator count N, not by
//! the degree of node i. Isolated nodes have zero velocity.

use kuramoto_types::{Graph, SyncError, SyncResult};

/// Autonomous or time-dependent ODE system `dx/dt = f(t, x)`.
pub trait DynamicalSystem {
    /// State dimension.
    fn dimension(&self) -> usize;

    /// Write `f(t, state)` into `out`. Both slices have length `dimension()`.
    fn apply(&self, t: f64, state: &[f64], out: &mut [f64]);
}

/// Immutable evaluation context for the Kuramoto vector field.
#[derive(Debug, Clone, Copy)]
pub struct KuramotoSystem<'g> {
    graph: &'g Graph,
    n: usize,
}

impl<'g> KuramotoSystem<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            n: graph.node_count(),
        }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Allocating convenience wrapper around [`DynamicalSystem::apply`].
    /// `theta` must hold one phase per node.
    pub fn velocities(&self, theta: &[f64], t: f64) -> SyncResult<Vec<f64>> {
        if theta.len() != self.n {
            return Err(SyncError::Validation(format!(
                "phase vector length {} != node count {}",
                theta.len(),
                self.n
            )));
        }
        let mut out = vec![0.0; self.n];
        self.apply(t, theta, &mut out);
        Ok(out)
    }
}

impl DynamicalSystem for KuramotoSystem<'_> {
    fn dimension(&self) -> usize {
        self.n
    }

    fn apply(&self, _t: f64, theta: &[f64], out: &mut [f64]) {
        let nf = self.n as f64;
        for (i, dtheta) in out.iter_mut().enumerate().take(self.n) {
            let coupling: f64 = self
                .graph
                .neighbors(i)
                .map(|j| (theta[j] - theta[i]).sin())
                .sum();
            *dtheta = coupling / nf;
        }
    }
}
