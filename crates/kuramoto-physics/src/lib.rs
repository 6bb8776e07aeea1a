// ─────────────────────────────────────────────────────────────────────
// Kuramoto Sync — Oscillator Physics Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Kuramoto vector field, ODE solvers, local order parameter, and the
//! windowed phase integrator.
//!
//!   dθ_i/dt = (1/N) Σ_{j ∈ N(i)} sin(θ_j − θ_i)
//!
//! # Invariants
//!
//! 1. **Phases stay on the circle**: after every window each θ_i is
//!    reduced into `[0, 2π)` before the order parameter reads it.
//!
//! 2. **Order is checked before integrating**: a run whose initial
//!    phases already meet the threshold returns without a solver call.
//!
//! 3. **Bounded by default**: the window loop stops at `max_windows`
//!    with `SyncError::NonConvergence` unless the cap is disabled.
//!
//! 4. **The graph is read-only**: `KuramotoSystem` borrows it, and one
//!    graph can back any number of concurrent runs.

pub mod integrator;
pub mod order;
pub mod solver;
pub mod system;

pub use integrator::{
    get_phase_value, CancellationToken, PhaseIntegrator, SimulationOutcome, WindowLog,
};
pub use order::{global_order_parameter, local_order_parameter};
pub use solver::{solver_for, DormandPrince, OdeSolver, Rk4};
pub use system::{DynamicalSystem, KuramotoSystem};
