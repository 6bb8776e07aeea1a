// ─────────────────────────────────────────────────────────────────────
// Kuramoto Sync — Synchronous Ensemble Allocator
// ─────────────────────────────────────────────────────────────────────
//! Greedy single-pass grouping of oscillators by phase proximity.
//!
//! Oscillators are visited in index order. Each one joins the first
//! existing group holding *any* member within `tolerance`, either
//! directly or through the 0/2π seam, and otherwise opens a new group.
//! The result depends on visiting order: two phases both close to a
//! group may still land in different groups.

use std::f64::consts::TAU;

use kuramoto_types::phase::ensure_finite;
use kuramoto_types::{ClusterAssignment, SyncError, SyncResult};

/// Default proximity tolerance (rad).
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// `candidate` matches `member` directly, or against the member's phase
/// reflected through the seam, `|member − 2π|`.
#[inline]
fn in_phase(candidate: f64, member: f64, tolerance: f64) -> bool {
    let shifted = (member - TAU).abs();
    (candidate - member).abs() < tolerance || (candidate - shifted).abs() < tolerance
}

/// Partition oscillators into synchronous ensembles.
///
/// Group ids follow creation order, so oscillator 0 is always in group 0.
pub fn allocate_sync_ensembles(phases: &[f64], tolerance: f64) -> SyncResult<ClusterAssignment> {
    if !(tolerance >= 0.0 && tolerance.is_finite()) {
        return Err(SyncError::Validation(format!(
            "tolerance must be finite and >= 0, got {tolerance}"
        )));
    }
    ensure_finite(phases)?;

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut labels = vec![0usize; phases.len()];

    for (i, &phase) in phases.iter().enumerate() {
        let found = groups.iter().position(|group| {
            group
                .iter()
                .any(|&m| in_phase(phase, phases[m], tolerance))
        });
        match found {
            Some(g) => {
                groups[g].push(i);
                labels[i] = g;
            }
            None => {
                labels[i] = groups.len();
                groups.push(vec![i]);
            }
        }
    }

    log::debug!(
        "allocated {} oscillators into {} ensembles (tolerance={tolerance:.4})",
        phases.len(),
        groups.len()
    );
    Ok(ClusterAssignment::new(labels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_tight_groups() {
        let phases = [1.0, 1.001, 4.0, 1.002, 4.005];
        let a = allocate_sync_ensembles(&phases, DEFAULT_TOLERANCE).unwrap();
        assert_eq!(a.labels, vec![0, 0, 1, 0, 1]);
    }

    #[test]
    fn test_wraparound_pair_grouped() {
        let phases = [0.001, TAU - 0.001];
        let a = allocate_sync_ensembles(&phases, 0.01).unwrap();
        assert_eq!(a.labels, vec![0, 0]);
    }

    #[test]
    fn test_wraparound_either_order() {
        let phases = [TAU - 0.002, 0.003];
        let a = allocate_sync_ensembles(&phases, 0.01).unwrap();
        assert_eq!(a.labels, vec![0, 0]);
    }

    #[test]
    fn test_chaining_through_any_member() {
        // 0.0 → 0.008 → 0.016: the third is out of reach of the first but
        // within tolerance of the second member.
        let phases = [0.0, 0.008, 0.016];
        let a = allocate_sync_ensembles(&phases, 0.01).unwrap();
        assert_eq!(a.labels, vec![0, 0, 0]);
    }

    #[test]
    fn test_order_sensitive_split() {
        // Visiting 0.0 then 0.016 opens two groups before 0.008 arrives;
        // 0.008 joins the first group it matches and the split persists.
        let phases = [0.0, 0.016, 0.008];
        let a = allocate_sync_ensembles(&phases, 0.01).unwrap();
        assert_eq!(a.labels, vec![0, 1, 0]);
    }

    #[test]
    fn test_first_group_wins() {
        let phases = [1.0, 1.015, 1.0075];
        let a = allocate_sync_ensembles(&phases, 0.01).unwrap();
        assert_eq!(a.labels, vec![0, 1, 0]);
    }

    #[test]
    fn test_strict_inequality() {
        let a = allocate_sync_ensembles(&[0.0, 0.5], 0.5).unwrap();
        assert_eq!(a.n_clusters(), 2);
    }

    #[test]
    fn test_zero_tolerance_all_singletons() {
        let a = allocate_sync_ensembles(&[1.0, 1.0, 2.0], 0.0).unwrap();
        assert_eq!(a.labels, vec![0, 1, 2]);
    }

    #[test]
    fn test_repeated_runs_same_partition() {
        let phases = [0.2, 3.1, 0.205, 6.28, 3.104, 0.001];
        let a = allocate_sync_ensembles(&phases, 0.01).unwrap();
        let b = allocate_sync_ensembles(&phases, 0.01).unwrap();
        assert!(a.same_partition(&b));
        assert_eq!(a.labels[0], 0);
    }

    #[test]
    fn test_empty_input() {
        let a = allocate_sync_ensembles(&[], 0.01).unwrap();
        assert!(a.is_empty());
    }

    #[test]
    fn test_invalid_tolerance() {
        assert!(matches!(
            allocate_sync_ensembles(&[0.0], -1.0),
            Err(SyncError::Validation(_))
        ));
        assert!(allocate_sync_ensembles(&[0.0], f64::NAN).is_err());
    }

    #[test]
    fn test_nan_phase_rejected() {
        assert!(matches!(
            allocate_sync_ensembles(&[0.0, f64::NAN], 0.01),
            Err(SyncError::Validation(_))
        ));
    }
}
