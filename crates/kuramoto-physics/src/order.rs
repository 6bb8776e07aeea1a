// ─────────────────────────────────────────────────────────────────────
// Kuramoto Sync — Order Parameters
// ─────────────────────────────────────────────────────────────────────
//! Synchronization metrics.
//!
//! - Local order: edge-averaged `exp(−|θ_j − θ_i|)`. Tends to 1.0 as
//!   adjacent oscillators lock and to 0.0 as they drift apart. This is
//!   the stopping criterion of the integrator.
//! - Global order: Kuramoto `R = |⟨e^{iθ}⟩|`, reported as a diagnostic.
//!
//! The local metric uses the raw difference of normalized phases, with no
//! wraparound: two oscillators at 0⁺ and 2π⁻ count as far apart.

use kuramoto_types::{Graph, SyncError, SyncResult};

/// Local order parameter of `phases` over the edges of `graph`.
///
/// Each undirected edge contributes once.
pub fn local_order_parameter(phases: &[f64], graph: &Graph) -> SyncResult<f64> {
    if phases.len() != graph.node_count() {
        return Err(SyncError::Validation(format!(
            "phase vector length {} != node count {}",
            phases.len(),
            graph.node_count()
        )));
    }
    let m = graph.edge_count();
    if m == 0 {
        return Err(SyncError::InvalidGraph(
            "local order parameter needs at least one edge".to_string(),
        ));
    }
    let exp_amount: f64 = graph
        .edges()
        .map(|(i, j)| (-(phases[j] - phases[i]).abs()).exp())
        .sum();
    Ok(exp_amount / m as f64)
}

/// Kuramoto order parameter R = |⟨e^{iθ}⟩| ∈ [0, 1]. Empty input gives 0.
pub fn global_order_parameter(theta: &[f64]) -> f64 {
    let n = theta.len() as f64;
    if n < 1.0 {
        return 0.0;
    }
    let (sum_sin, sum_cos) = theta
        .iter()
        .fold((0.0, 0.0), |(s, c), &th| (s + th.sin(), c + th.cos()));
    let r = ((sum_sin / n).powi(2) + (sum_cos / n).powi(2)).sqrt();
    r.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_edge() -> Graph {
        Graph::from_edges(2, &[(0, 1)]).unwrap()
    }

    #[test]
    fn test_single_edge_equal_phases_is_exactly_one() {
        let r = local_order_parameter(&[0.0, 0.0], &single_edge()).unwrap();
        assert_eq!(r, 1.0);
    }

    #[test]
    fn test_all_equal_phases_is_one() {
        let g = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
        let r = local_order_parameter(&[2.5; 4], &g).unwrap();
        assert_eq!(r, 1.0);
    }

    #[test]
    fn test_strictly_decreasing_with_spread() {
        let g = single_edge();
        let mut prev = f64::INFINITY;
        for k in 0..20 {
            let d = 0.3 * k as f64;
            let r = local_order_parameter(&[0.0, d], &g).unwrap();
            assert!(r < prev, "order not decreasing at d={d}: {r} >= {prev}");
            assert!(r > 0.0 && r <= 1.0);
            prev = r;
        }
    }

    #[test]
    fn test_each_edge_counted_once() {
        // Path 0-1-2, phases 0, 1, 1: edges contribute e^{-1} and 1.
        let g = Graph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let r = local_order_parameter(&[0.0, 1.0, 1.0], &g).unwrap();
        let expected = ((-1.0f64).exp() + 1.0) / 2.0;
        assert!((r - expected).abs() < 1e-15);
    }

    #[test]
    fn test_no_wraparound_across_seam() {
        let tau = std::f64::consts::TAU;
        let r = local_order_parameter(&[0.001, tau - 0.001], &single_edge()).unwrap();
        assert!(r < 0.01, "seam-straddling pair scored {r}");
    }

    #[test]
    fn test_zero_edges_is_invalid_graph() {
        let err = local_order_parameter(&[0.0, 1.0], &Graph::new(2)).unwrap_err();
        assert!(matches!(err, SyncError::InvalidGraph(_)));
    }

    #[test]
    fn test_length_mismatch() {
        let err = local_order_parameter(&[0.0], &single_edge()).unwrap_err();
        assert!(matches!(err, SyncError::Validation(_)));
    }

    #[test]
    fn test_global_order_sync() {
        let r = global_order_parameter(&[0.5; 4]);
        assert!((r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_global_order_desync() {
        let tau = std::f64::consts::TAU;
        let theta: Vec<f64> = (0..4).map(|i| i as f64 * tau / 4.0).collect();
        let r = global_order_parameter(&theta);
        assert!(r < 0.1, "R={r} should be near 0 for uniform phases");
    }

    #[test]
    fn test_global_order_empty() {
        assert_eq!(global_order_parameter(&[]), 0.0);
    }
}
