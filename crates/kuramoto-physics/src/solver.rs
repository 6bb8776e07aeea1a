// ─────────────────────────────────────────────────────────────────────
// Kuramoto Sync — Initial-Value Problem Solvers
// ─────────────────────────────────────────────────────────────────────
//! General-purpose IVP solvers: given a vector field, an initial state
//! and a non-decreasing sequence of evaluation times, return the state
//! at every requested time (entry 0 is the initial state itself).
//!
//! - `Rk4`: classic fixed-step Runge–Kutta, `ceil(dt / max_step)`
//!   equal substeps per output interval.
//! - `DormandPrince`: adaptive RK5(4) with embedded error estimate and
//!   mixed absolute/relative tolerance.

use kuramoto_types::{SolverConfig, SolverKind, SyncError, SyncResult};

use crate::system::DynamicalSystem;

/// Integrates a [`DynamicalSystem`] through a sequence of output times.
pub trait OdeSolver: Send + Sync {
    fn solve(
        &self,
        system: &dyn DynamicalSystem,
        y0: &[f64],
        times: &[f64],
    ) -> SyncResult<Vec<Vec<f64>>>;
}

/// Build the solver selected by `cfg.kind`.
pub fn solver_for(cfg: &SolverConfig) -> Box<dyn OdeSolver> {
    match cfg.kind {
        SolverKind::Rk4 => Box::new(Rk4::new(cfg.max_step)),
        SolverKind::DormandPrince => Box::new(DormandPrince::from_config(cfg)),
    }
}

fn check_inputs(system: &dyn DynamicalSystem, y0: &[f64], times: &[f64]) -> SyncResult<()> {
    if y0.len() != system.dimension() {
        return Err(SyncError::SimulationFailure(format!(
            "state length {} != system dimension {}",
            y0.len(),
            system.dimension()
        )));
    }
    if times.is_empty() {
        return Err(SyncError::SimulationFailure(
            "no evaluation times".to_string(),
        ));
    }
    if times.iter().any(|t| !t.is_finite()) || times.windows(2).any(|w| w[1] < w[0]) {
        return Err(SyncError::SimulationFailure(
            "evaluation times must be finite and non-decreasing".to_string(),
        ));
    }
    if y0.iter().any(|y| !y.is_finite()) {
        return Err(SyncError::SimulationFailure(
            "initial state contains NaN or Inf".to_string(),
        ));
    }
    Ok(())
}

fn ensure_finite_state(y: &[f64], t: f64) -> SyncResult<()> {
    if y.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(SyncError::SimulationFailure(format!(
            "state became non-finite at t={t}"
        )))
    }
}

// ─── RK4 ────────────────────────────────────────────────────────────

/// Fixed-step fourth-order Runge–Kutta.
#[derive(Debug, Clone)]
pub struct Rk4 {
    pub max_step: f64,
}

impl Rk4 {
    pub fn new(max_step: f64) -> Self {
        Self { max_step }
    }

    fn step(
        system: &dyn DynamicalSystem,
        t: f64,
        y: &mut [f64],
        h: f64,
        scratch: &mut Rk4Scratch,
    ) {
        let dim = y.len();
        let Rk4Scratch { k1, k2, k3, k4, tmp } = scratch;

        system.apply(t, y, k1);
        for i in 0..dim {
            tmp[i] = y[i] + 0.5 * h * k1[i];
        }
        system.apply(t + 0.5 * h, tmp, k2);
        for i in 0..dim {
            tmp[i] = y[i] + 0.5 * h * k2[i];
        }
        system.apply(t + 0.5 * h, tmp, k3);
        for i in 0..dim {
            tmp[i] = y[i] + h * k3[i];
        }
        system.apply(t + h, tmp, k4);
        for i in 0..dim {
            y[i] += h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }
    }
}

struct Rk4Scratch {
    k1: Vec<f64>,
    k2: Vec<f64>,
    k3: Vec<f64>,
    k4: Vec<f64>,
    tmp: Vec<f64>,
}

impl Rk4Scratch {
    fn new(dim: usize) -> Self {
        Self {
            k1: vec![0.0; dim],
            k2: vec![0.0; dim],
            k3: vec![0.0; dim],
            k4: vec![0.0; dim],
            tmp: vec![0.0; dim],
        }
    }
}

impl OdeSolver for Rk4 {
    fn solve(
        &self,
        system: &dyn DynamicalSystem,
        y0: &[f64],
        times: &[f64],
    ) -> SyncResult<Vec<Vec<f64>>> {
        check_inputs(system, y0, times)?;
        if !(self.max_step > 0.0) {
            return Err(SyncError::SimulationFailure(format!(
                "RK4 max_step must be > 0, got {}",
                self.max_step
            )));
        }

        let mut scratch = Rk4Scratch::new(y0.len());
        let mut y = y0.to_vec();
        let mut out = Vec::with_capacity(times.len());
        out.push(y.clone());

        for w in times.windows(2) {
            let (t0, t1) = (w[0], w[1]);
            let span = t1 - t0;
            if span > 0.0 {
                let substeps = (span / self.max_step).ceil().max(1.0) as usize;
                let h = span / substeps as f64;
                for s in 0..substeps {
                    Self::step(system, t0 + s as f64 * h, &mut y, h, &mut scratch);
                }
                ensure_finite_state(&y, t1)?;
            }
            out.push(y.clone());
        }
        Ok(out)
    }
}

// ─── Dormand–Prince RK5(4) ──────────────────────────────────────────

const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// Fifth-order weights (also the last stage row).
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// b − b*: fifth minus embedded fourth-order weights.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// Adaptive Dormand–Prince integrator.
#[derive(Debug, Clone)]
pub struct DormandPrince {
    pub rtol: f64,
    pub atol: f64,
    pub max_step: f64,
    pub min_step: f64,
    /// Internal step budget per output interval.
    pub max_steps: usize,
}

impl DormandPrince {
    pub fn from_config(cfg: &SolverConfig) -> Self {
        Self {
            rtol: cfg.rtol,
            atol: cfg.atol,
            max_step: cfg.max_step,
            min_step: cfg.min_step,
            max_steps: cfg.max_steps,
        }
    }

    /// Initial step guess from the local scale of `y` and `f(t0, y)`.
    fn initial_step(&self, y: &[f64], f0: &[f64], span: f64) -> f64 {
        let n = y.len().max(1) as f64;
        let (mut d0, mut d1) = (0.0, 0.0);
        for (yi, fi) in y.iter().zip(f0) {
            let sc = self.atol + self.rtol * yi.abs();
            d0 += (yi / sc).powi(2);
            d1 += (fi / sc).powi(2);
        }
        let (d0, d1) = ((d0 / n).sqrt(), (d1 / n).sqrt());
        let h = if d0 < 1e-5 || d1 < 1e-5 {
            1e-6
        } else {
            0.01 * d0 / d1
        };
        h.min(self.max_step).min(span).max(self.min_step)
    }

    /// One trial step from (t, y) with size h. Writes the fifth-order
    /// solution into `y_new` and returns the scaled RMS error.
    fn trial_step(
        &self,
        system: &dyn DynamicalSystem,
        t: f64,
        y: &[f64],
        h: f64,
        s: &mut DopriScratch,
    ) -> f64 {
        let dim = y.len();
        let DopriScratch {
            k1,
            k2,
            k3,
            k4,
            k5,
            k6,
            k7,
            tmp,
            y_new,
        } = s;

        system.apply(t, y, k1);
        for i in 0..dim {
            tmp[i] = y[i] + h * A21 * k1[i];
        }
        system.apply(t + C2 * h, tmp, k2);
        for i in 0..dim {
            tmp[i] = y[i] + h * (A31 * k1[i] + A32 * k2[i]);
        }
        system.apply(t + C3 * h, tmp, k3);
        for i in 0..dim {
            tmp[i] = y[i] + h * (A41 * k1[i] + A42 * k2[i] + A43 * k3[i]);
        }
        system.apply(t + C4 * h, tmp, k4);
        for i in 0..dim {
            tmp[i] = y[i] + h * (A51 * k1[i] + A52 * k2[i] + A53 * k3[i] + A54 * k4[i]);
        }
        system.apply(t + C5 * h, tmp, k5);
        for i in 0..dim {
            tmp[i] = y[i]
                + h * (A61 * k1[i] + A62 * k2[i] + A63 * k3[i] + A64 * k4[i] + A65 * k5[i]);
        }
        system.apply(t + h, tmp, k6);
        for i in 0..dim {
            y_new[i] =
                y[i] + h * (B1 * k1[i] + B3 * k3[i] + B4 * k4[i] + B5 * k5[i] + B6 * k6[i]);
        }
        system.apply(t + h, y_new, k7);

        let mut err_sq = 0.0;
        for i in 0..dim {
            let err = h
                * (E1 * k1[i] + E3 * k3[i] + E4 * k4[i] + E5 * k5[i] + E6 * k6[i] + E7 * k7[i]);
            let sc = self.atol + self.rtol * y[i].abs().max(y_new[i].abs());
            err_sq += (err / sc).powi(2);
        }
        (err_sq / dim.max(1) as f64).sqrt()
    }
}

struct DopriScratch {
    k1: Vec<f64>,
    k2: Vec<f64>,
    k3: Vec<f64>,
    k4: Vec<f64>,
    k5: Vec<f64>,
    k6: Vec<f64>,
    k7: Vec<f64>,
    tmp: Vec<f64>,
    y_new: Vec<f64>,
}

impl DopriScratch {
    fn new(dim: usize) -> Self {
        Self {
            k1: vec![0.0; dim],
            k2: vec![0.0; dim],
            k3: vec![0.0; dim],
            k4: vec![0.0; dim],
            k5: vec![0.0; dim],
            k6: vec![0.0; dim],
            k7: vec![0.0; dim],
            tmp: vec![0.0; dim],
            y_new: vec![0.0; dim],
        }
    }
}

impl OdeSolver for DormandPrince {
    fn solve(
        &self,
        system: &dyn DynamicalSystem,
        y0: &[f64],
        times: &[f64],
    ) -> SyncResult<Vec<Vec<f64>>> {
        check_inputs(system, y0, times)?;

        let dim = y0.len();
        let mut s = DopriScratch::new(dim);
        let mut y = y0.to_vec();
        let mut out = Vec::with_capacity(times.len());
        out.push(y.clone());

        let mut t = times[0];
        let mut h = 0.0;

        for &t_out in &times[1..] {
            let mut steps = 0usize;
            while t_out - t > 1e-12 * t_out.abs().max(1.0) {
                if h <= 0.0 {
                    let mut f0 = vec![0.0; dim];
                    system.apply(t, &y, &mut f0);
                    h = self.initial_step(&y, &f0, t_out - t);
                }
                if steps >= self.max_steps {
                    return Err(SyncError::SimulationFailure(format!(
                        "exceeded {} internal steps before t={t_out}",
                        self.max_steps
                    )));
                }
                steps += 1;

                let remaining = t_out - t;
                let clipped = h.min(remaining);
                let err = self.trial_step(system, t, &y, clipped, &mut s);
                if !err.is_finite() {
                    return Err(SyncError::SimulationFailure(format!(
                        "non-finite error estimate at t={t}"
                    )));
                }

                let factor = if err == 0.0 {
                    MAX_FACTOR
                } else {
                    (SAFETY * err.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
                };

                if err <= 1.0 {
                    t = if clipped == remaining { t_out } else { t + clipped };
                    y.copy_from_slice(&s.y_new);
                    ensure_finite_state(&y, t)?;
                    // Grow from the unclipped step: clipping only lands us on t_out.
                    h = (h * factor).min(self.max_step);
                } else {
                    h = clipped * factor;
                    if h < self.min_step {
                        return Err(SyncError::SimulationFailure(format!(
                            "step size underflow ({h:e}) at t={t}"
                        )));
                    }
                }
            }
            out.push(y.clone());
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dy/dt = -y, exact solution y0·e^{-t}.
    struct Decay;

    impl DynamicalSystem for Decay {
        fn dimension(&self) -> usize {
            1
        }
        fn apply(&self, _t: f64, y: &[f64], out: &mut [f64]) {
            out[0] = -y[0];
        }
    }

    /// Harmonic oscillator x'' = -x as a 2-D system.
    struct Harmonic;

    impl DynamicalSystem for Harmonic {
        fn dimension(&self) -> usize {
            2
        }
        fn apply(&self, _t: f64, y: &[f64], out: &mut [f64]) {
            out[0] = y[1];
            out[1] = -y[0];
        }
    }

    /// Blows up: dy/dt = y².
    struct Blowup;

    impl DynamicalSystem for Blowup {
        fn dimension(&self) -> usize {
            1
        }
        fn apply(&self, _t: f64, y: &[f64], out: &mut [f64]) {
            out[0] = y[0] * y[0];
        }
    }

    fn grid(t0: f64, t1: f64, n: usize) -> Vec<f64> {
        (0..=n).map(|i| t0 + (t1 - t0) * i as f64 / n as f64).collect()
    }

    #[test]
    fn test_rk4_exponential_decay() {
        let times = grid(0.0, 1.0, 10);
        let out = Rk4::new(0.01).solve(&Decay, &[1.0], &times).unwrap();
        assert_eq!(out.len(), times.len());
        for (y, &t) in out.iter().zip(&times) {
            assert!((y[0] - (-t).exp()).abs() < 1e-9, "t={t} y={}", y[0]);
        }
    }

    #[test]
    fn test_dopri_exponential_decay() {
        let cfg = SolverConfig::default();
        let times = grid(0.0, 2.0, 20);
        let out = DormandPrince::from_config(&cfg)
            .solve(&Decay, &[1.0], &times)
            .unwrap();
        let last = out.last().unwrap()[0];
        assert!((last - (-2.0f64).exp()).abs() < 1e-7, "y(2)={last}");
    }

    #[test]
    fn test_dopri_harmonic_period() {
        let cfg = SolverConfig {
            max_step: 0.1,
            ..SolverConfig::default()
        };
        let tau = std::f64::consts::TAU;
        let out = DormandPrince::from_config(&cfg)
            .solve(&Harmonic, &[1.0, 0.0], &[0.0, tau / 2.0, tau])
            .unwrap();
        assert!((out[1][0] + 1.0).abs() < 1e-6, "x(π)={}", out[1][0]);
        assert!((out[2][0] - 1.0).abs() < 1e-6, "x(2π)={}", out[2][0]);
        assert!(out[2][1].abs() < 1e-6);
    }

    #[test]
    fn test_first_entry_is_initial_state() {
        let out = Rk4::new(0.05)
            .solve(&Harmonic, &[0.3, -0.2], &[5.0, 5.5])
            .unwrap();
        assert_eq!(out[0], vec![0.3, -0.2]);
    }

    #[test]
    fn test_repeated_time_returns_same_state() {
        let out = Rk4::new(0.05)
            .solve(&Decay, &[1.0], &[0.0, 0.5, 0.5])
            .unwrap();
        assert_eq!(out[1], out[2]);
    }

    #[test]
    fn test_decreasing_times_rejected() {
        let err = Rk4::new(0.01)
            .solve(&Decay, &[1.0], &[1.0, 0.5])
            .unwrap_err();
        assert!(matches!(err, SyncError::SimulationFailure(_)));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let err = Rk4::new(0.01)
            .solve(&Harmonic, &[1.0], &[0.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, SyncError::SimulationFailure(_)));
    }

    #[test]
    fn test_blowup_reported_as_failure() {
        // y(t) = 1 / (1 − t) diverges at t = 1.
        let cfg = SolverConfig::default();
        let err = DormandPrince::from_config(&cfg)
            .solve(&Blowup, &[1.0], &[0.0, 2.0])
            .unwrap_err();
        assert!(matches!(err, SyncError::SimulationFailure(_)));
    }

    #[test]
    fn test_rk4_blowup_non_finite() {
        let err = Rk4::new(0.5)
            .solve(&Blowup, &[1.0], &[0.0, 200.0])
            .unwrap_err();
        assert!(matches!(err, SyncError::SimulationFailure(_)));
    }

    #[test]
    fn test_solver_for_dispatch() {
        let rk = solver_for(&SolverConfig {
            kind: SolverKind::Rk4,
            ..SolverConfig::default()
        });
        let dp = solver_for(&SolverConfig::default());
        let a = rk.solve(&Decay, &[1.0], &[0.0, 1.0]).unwrap();
        let b = dp.solve(&Decay, &[1.0], &[0.0, 1.0]).unwrap();
        assert!((a[1][0] - b[1][0]).abs() < 1e-8);
    }
}
