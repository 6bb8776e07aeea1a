// ─────────────────────────────────────────────────────────────────────
// Kuramoto Sync — Detection Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for the integrator loop and both clustering paths.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use kuramoto_detect::{allocate_sync_ensembles, standardize, KMeans, KuramotoDetector};
use kuramoto_physics::{local_order_parameter, PhaseIntegrator};
use kuramoto_types::{
    ClusteringMethod, DetectionConfig, Graph, KMeansConfig, SimulationConfig, SolverConfig,
    SolverKind,
};

/// `groups` cliques of `size` nodes, consecutive cliques joined by one edge.
fn clique_chain(groups: usize, size: usize) -> Graph {
    let mut edges = Vec::new();
    for g in 0..groups {
        let base = g * size;
        for i in 0..size {
            for j in (i + 1)..size {
                edges.push((base + i, base + j));
            }
        }
        if g + 1 < groups {
            edges.push((base + size - 1, base + size));
        }
    }
    Graph::from_edges(groups * size, &edges).unwrap()
}

/// Deterministic spread of phases in a narrow band away from the seam.
fn banded_phases(n: usize) -> Vec<f64> {
    (0..n).map(|i| 2.0 + 2.0 * i as f64 / n as f64).collect()
}

/// Clustered phases: `n` values around four centres.
fn clustered_phases(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.8 + 1.4 * (i % 4) as f64 + 0.001 * (i / 4) as f64)
        .collect()
}

// ── Order parameter ─────────────────────────────────────────────────

fn bench_local_order(c: &mut Criterion) {
    let g = clique_chain(10, 10);
    let phases = banded_phases(g.node_count());
    c.bench_function("local_order_100n", |b| {
        b.iter(|| local_order_parameter(black_box(&phases), &g))
    });
}

// ── PhaseIntegrator.run_from() ──────────────────────────────────────

fn bench_integrator(c: &mut Criterion, name: &str, kind: SolverKind) {
    let g = clique_chain(2, 3);
    let integ = PhaseIntegrator::new(SimulationConfig {
        order_threshold: 0.95,
        solver: SolverConfig {
            kind,
            ..SolverConfig::default()
        },
        ..SimulationConfig::default()
    })
    .unwrap();
    let initial = banded_phases(g.node_count());
    c.bench_function(name, |b| {
        b.iter(|| integ.run_from(&g, black_box(initial.clone())))
    });
}

fn bench_integrator_dopri(c: &mut Criterion) {
    bench_integrator(c, "integrator_two_cliques_dopri", SolverKind::DormandPrince);
}

fn bench_integrator_rk4(c: &mut Criterion) {
    bench_integrator(c, "integrator_two_cliques_rk4", SolverKind::Rk4);
}

// ── Clustering ──────────────────────────────────────────────────────

fn bench_allocator_1000(c: &mut Criterion) {
    let phases = clustered_phases(1000);
    c.bench_function("allocate_sync_ensembles_1000", |b| {
        b.iter(|| allocate_sync_ensembles(black_box(&phases), 0.5))
    });
}

fn bench_kmeans_1000(c: &mut Criterion) {
    let z = standardize(&clustered_phases(1000)).unwrap();
    let kmeans = KMeans::new(
        4,
        KMeansConfig {
            seed: Some(42),
            ..KMeansConfig::default()
        },
    )
    .unwrap();
    c.bench_function("kmeans_k4_1000", |b| {
        b.iter(|| kmeans.fit_predict(black_box(&z)))
    });
}

fn bench_detect_phases(c: &mut Criterion) {
    let detector = KuramotoDetector::new(DetectionConfig {
        method: ClusteringMethod::GreedyTolerance { tolerance: None },
        ..DetectionConfig::default()
    })
    .unwrap();
    let phases = clustered_phases(1000);
    c.bench_function("detect_phases_greedy_1000", |b| {
        b.iter(|| detector.detect_phases(black_box(&phases)))
    });
}

criterion_group!(
    benches,
    bench_local_order,
    bench_integrator_dopri,
    bench_integrator_rk4,
    bench_allocator_1000,
    bench_kmeans_1000,
    bench_detect_phases,
);
criterion_main!(benches);
