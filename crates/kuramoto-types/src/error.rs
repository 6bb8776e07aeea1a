// ─────────────────────────────────────────────────────────────────────
// Kuramoto Sync — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all engine failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// Graph cannot be used: zero edges, self-loop, or endpoint out of range.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// Integration hit the window cap before reaching the order threshold.
    #[error(
        "no convergence after {windows} windows: local order {order:.6} < threshold {threshold}"
    )]
    NonConvergence {
        windows: u64,
        order: f64,
        threshold: f64,
    },

    /// Phases carry no spread, so a std-based tolerance or scaling is undefined.
    #[error("degenerate clustering: {0}")]
    DegenerateClustering(String),

    /// ODE solver failed (non-finite state, step underflow, step budget).
    #[error("simulation failure: {0}")]
    SimulationFailure(String),

    /// Caller cancelled the run between integration windows.
    #[error("simulation cancelled")]
    Cancelled,

    /// Wall-clock budget exhausted.
    #[error("timeout: simulation exceeded {deadline_ms}ms deadline")]
    Timeout { deadline_ms: u64 },

    /// Invalid input (phase vector, tolerance, cluster count).
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
}

pub type SyncResult<T> = Result<T, SyncError>;
