// ─────────────────────────────────────────────────────────────────────
// Kuramoto Sync — Engine Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! Kuramoto synchronization engine.
//!
//! The engine treats a [`Graph`] as read-only input and never mutates it.
//! Phase vectors are plain `Vec<f64>` normalized into `[0, 2π)`; see
//! [`phase`] for the normalization helpers every component relies on.

pub mod assignment;
pub mod config;
pub mod error;
pub mod graph;
pub mod phase;

pub use assignment::ClusterAssignment;
pub use config::{
    ClusteringMethod, DetectionConfig, KMeansConfig, SimulationConfig, SolverConfig, SolverKind,
};
pub use error::{SyncError, SyncResult};
pub use graph::Graph;
pub use phase::{normalize_phase, normalize_phases};
