// ─────────────────────────────────────────────────────────────────────
// Kuramoto Sync — PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied; PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the Kuramoto sync engine.
//!
//! Graphs cross the boundary as `(n, edges)` with `edges` a list of
//! `(i, j)` index pairs.
//!
//! Error mapping:
//! - `Validation`, `InvalidGraph`, `Config` → `ValueError`
//! - everything else → `RuntimeError`
//!
//! Install: `pip install -e crates/kuramoto-ffi` (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from kuramoto_sync import kuramoto_detection, DetectionConfig, KuramotoDetector
//!
//! labels = kuramoto_detection(6, [(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)])
//! det = KuramotoDetector(DetectionConfig(k=2, seed=7))
//! ```

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use kuramoto_detect::KuramotoDetector;
use kuramoto_physics::local_order_parameter;
use kuramoto_types::{
    ClusteringMethod, DetectionConfig, Graph, SimulationConfig, SolverKind, SyncError,
};

fn to_py_err(err: SyncError) -> PyErr {
    match err {
        SyncError::Validation(_) | SyncError::InvalidGraph(_) | SyncError::Config(_) => {
            PyValueError::new_err(err.to_string())
        }
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

fn build_graph(n: usize, edges: Vec<(usize, usize)>) -> PyResult<Graph> {
    Graph::from_edges(n, &edges).map_err(to_py_err)
}

// ─── PyDetectionConfig ──────────────────────────────────────────────

/// Python-visible detection configuration.
#[pyclass(name = "DetectionConfig")]
#[derive(Clone)]
struct PyDetectionConfig {
    inner: DetectionConfig,
}

#[pymethods]
impl PyDetectionConfig {
    #[new]
    #[pyo3(signature = (
        order_threshold = 0.99,
        k = None,
        tolerance = None,
        max_windows = Some(10_000),
        deadline_ms = None,
        seed = None,
        solver = "dormand_prince",
    ))]
    fn new(
        order_threshold: f64,
        k: Option<usize>,
        tolerance: Option<f64>,
        max_windows: Option<u64>,
        deadline_ms: Option<u64>,
        seed: Option<u64>,
        solver: &str,
    ) -> PyResult<Self> {
        let kind = match solver {
            "dormand_prince" => SolverKind::DormandPrince,
            "rk4" => SolverKind::Rk4,
            other => {
                return Err(PyValueError::new_err(format!(
                    "unknown solver '{other}', expected 'dormand_prince' or 'rk4'"
                )))
            }
        };
        let method = match k {
            Some(k) => ClusteringMethod::FixedK { k },
            None => ClusteringMethod::GreedyTolerance { tolerance },
        };
        let mut config = DetectionConfig {
            simulation: SimulationConfig {
                order_threshold,
                max_windows,
                deadline_ms,
                seed,
                ..SimulationConfig::default()
            },
            method,
            ..DetectionConfig::default()
        };
        config.simulation.solver.kind = kind;
        config.kmeans.seed = seed;
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = DetectionConfig::from_json(json).map_err(to_py_err)?;
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    #[getter]
    fn order_threshold(&self) -> f64 {
        self.inner.simulation.order_threshold
    }

    #[getter]
    fn max_windows(&self) -> Option<u64> {
        self.inner.simulation.max_windows
    }

    fn __repr__(&self) -> String {
        let method = match self.inner.method {
            ClusteringMethod::GreedyTolerance { tolerance: Some(t) } => format!("greedy(tol={t})"),
            ClusteringMethod::GreedyTolerance { tolerance: None } => "greedy(tol=std/2)".to_string(),
            ClusteringMethod::FixedK { k } => format!("kmeans(k={k})"),
        };
        format!(
            "DetectionConfig(threshold={}, method={method}, max_windows={:?})",
            self.inner.simulation.order_threshold, self.inner.simulation.max_windows
        )
    }
}

// ─── PyKuramotoDetector ─────────────────────────────────────────────

/// Python-visible detector: simulate, then cluster.
#[pyclass(name = "KuramotoDetector")]
struct PyKuramotoDetector {
    inner: KuramotoDetector,
}

#[pymethods]
impl PyKuramotoDetector {
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<PyDetectionConfig>) -> PyResult<Self> {
        let config = config.map(|c| c.inner).unwrap_or_default();
        Ok(Self {
            inner: KuramotoDetector::new(config).map_err(to_py_err)?,
        })
    }

    /// Run detection. Returns dict with labels, phases, t, windows, order,
    /// tolerance.
    #[pyo3(signature = (n, edges, initial = None))]
    fn detect(
        &self,
        py: Python<'_>,
        n: usize,
        edges: Vec<(usize, usize)>,
        initial: Option<Vec<f64>>,
    ) -> PyResult<PyObject> {
        let graph = build_graph(n, edges)?;
        let det = match initial {
            Some(phases) => self.inner.detect_from(&graph, phases),
            None => self.inner.detect(&graph),
        }
        .map_err(to_py_err)?;
        let dict = PyDict::new(py);
        dict.set_item("labels", det.assignment.labels)?;
        dict.set_item("phases", det.outcome.phases)?;
        dict.set_item("t", det.outcome.t)?;
        dict.set_item("windows", det.outcome.windows)?;
        dict.set_item("order", det.outcome.order)?;
        dict.set_item("tolerance", det.tolerance)?;
        Ok(dict.into())
    }

    /// Cluster already-converged phases.
    fn detect_phases(&self, phases: Vec<f64>) -> PyResult<Vec<usize>> {
        self.inner
            .detect_phases(&phases)
            .map(|a| a.labels)
            .map_err(to_py_err)
    }
}

// ─── Free functions ─────────────────────────────────────────────────

/// Converged phases for the graph at the given local-order threshold.
#[pyfunction]
#[pyo3(signature = (n, edges, order = 0.99))]
fn get_phase_value(n: usize, edges: Vec<(usize, usize)>, order: f64) -> PyResult<Vec<f64>> {
    let graph = build_graph(n, edges)?;
    kuramoto_physics::get_phase_value(&graph, order).map_err(to_py_err)
}

/// Edge-averaged local order parameter of `phases`.
#[pyfunction]
fn local_sync_order(phases: Vec<f64>, n: usize, edges: Vec<(usize, usize)>) -> PyResult<f64> {
    let graph = build_graph(n, edges)?;
    local_order_parameter(&phases, &graph).map_err(to_py_err)
}

/// Greedy tolerance grouping with 0/2π wraparound.
#[pyfunction]
#[pyo3(signature = (phases, tolerance = kuramoto_detect::DEFAULT_TOLERANCE))]
fn allocate_sync_ensembles(phases: Vec<f64>, tolerance: f64) -> PyResult<Vec<usize>> {
    kuramoto_detect::allocate_sync_ensembles(&phases, tolerance)
        .map(|a| a.labels)
        .map_err(to_py_err)
}

/// Community labels with default settings; `k` selects k-means.
#[pyfunction]
#[pyo3(signature = (n, edges, k = None))]
fn kuramoto_detection(
    n: usize,
    edges: Vec<(usize, usize)>,
    k: Option<usize>,
) -> PyResult<Vec<usize>> {
    let graph = build_graph(n, edges)?;
    kuramoto_detect::kuramoto_detection(&graph, k)
        .map(|a| a.labels)
        .map_err(to_py_err)
}

// ─── Module Registration ────────────────────────────────────────────

/// Kuramoto Sync: oscillator-based community detection.
///
/// - `DetectionConfig` — configuration
/// - `KuramotoDetector` — simulate and cluster
/// - `get_phase_value`, `local_sync_order`, `allocate_sync_ensembles`,
///   `kuramoto_detection` — one-shot helpers
#[pymodule]
fn kuramoto_sync(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDetectionConfig>()?;
    m.add_class::<PyKuramotoDetector>()?;
    m.add_function(wrap_pyfunction!(get_phase_value, m)?)?;
    m.add_function(wrap_pyfunction!(local_sync_order, m)?)?;
    m.add_function(wrap_pyfunction!(allocate_sync_ensembles, m)?)?;
    m.add_function(wrap_pyfunction!(kuramoto_detection, m)?)?;
    Ok(())
}
