// ─────────────────────────────────────────────────────────────────────
// Kuramoto Sync — Phase Helpers
// ─────────────────────────────────────────────────────────────────────
//! Modular phase reduction onto the unit circle, θ ∈ [0, 2π).

use std::f64::consts::TAU;

use crate::error::{SyncError, SyncResult};

/// Reduce a phase into `[0, 2π)`.
///
/// `rem_euclid` rounds tiny negative inputs up to exactly `2π`; those are
/// folded back to `0.0` so the half-open interval holds.
#[inline]
pub fn normalize_phase(theta: f64) -> f64 {
    let r = theta.rem_euclid(TAU);
    if r >= TAU {
        0.0
    } else {
        r
    }
}

/// Normalize every component in place.
pub fn normalize_phases(theta: &mut [f64]) {
    for th in theta.iter_mut() {
        *th = normalize_phase(*th);
    }
}

/// True when every component lies in `[0, 2π)`.
pub fn is_normalized(theta: &[f64]) -> bool {
    theta.iter().all(|&th| (0.0..TAU).contains(&th))
}

/// Reject NaN / Inf components.
pub fn ensure_finite(theta: &[f64]) -> SyncResult<()> {
    match theta.iter().position(|th| !th.is_finite()) {
        Some(i) => Err(SyncError::Validation(format!(
            "phase[{i}] is not finite ({})",
            theta[i]
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_in_range_unchanged() {
        assert_eq!(normalize_phase(1.25), 1.25);
        assert_eq!(normalize_phase(0.0), 0.0);
    }

    #[test]
    fn test_normalize_wraps_positive() {
        let th = normalize_phase(TAU + 0.5);
        assert!((th - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_wraps_negative() {
        let th = normalize_phase(-0.5);
        assert!((th - (TAU - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_tiny_negative_stays_half_open() {
        let th = normalize_phase(-1e-20);
        assert!((0.0..TAU).contains(&th), "θ={th} escaped [0, 2π)");
    }

    #[test]
    fn test_normalize_exact_tau() {
        assert_eq!(normalize_phase(TAU), 0.0);
    }

    #[test]
    fn test_normalize_phases_slice() {
        let mut theta = vec![-3.0, 7.0, 20.0, TAU];
        normalize_phases(&mut theta);
        assert!(is_normalized(&theta));
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite(&[0.0, 1.0]).is_ok());
        let err = ensure_finite(&[0.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, SyncError::Validation(_)));
    }
}
