// ─────────────────────────────────────────────────────────────────────
// Kuramoto Sync — Community Detection
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Turns converged oscillator phases into community labels.
//!
//! Architecture:
//!   - ensemble: greedy single-pass tolerance grouping with 0/2π wraparound
//!   - kmeans: fixed-k centroid clustering over 1-D values
//!   - stats: mean / population std / standardization
//!   - detector: integrator → phases → `ClusteringMethod` dispatch

pub mod detector;
pub mod ensemble;
pub mod kmeans;
pub mod stats;

pub use detector::{kuramoto_detection, Detection, KuramotoDetector};
pub use ensemble::{allocate_sync_ensembles, DEFAULT_TOLERANCE};
pub use kmeans::KMeans;
pub use stats::{half_std_tolerance, mean, population_std, standardize};
