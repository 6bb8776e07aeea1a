// ─────────────────────────────────────────────────────────────────────
// Kuramoto Sync — Phase Statistics
// ─────────────────────────────────────────────────────────────────────

use kuramoto_types::{SyncError, SyncResult};

/// Spread below which phases are treated as identical.
const DEGENERATE_STD: f64 = 1e-12;

/// Arithmetic mean; 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n).
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    let var = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

fn spread(values: &[f64]) -> SyncResult<f64> {
    if values.is_empty() {
        return Err(SyncError::Validation("no phases to cluster".to_string()));
    }
    let sd = population_std(values);
    if !sd.is_finite() {
        return Err(SyncError::Validation(
            "phases contain NaN or Inf".to_string(),
        ));
    }
    if sd <= DEGENERATE_STD {
        return Err(SyncError::DegenerateClustering(format!(
            "phase std {sd:e} is zero; all {} phases coincide",
            values.len()
        )));
    }
    Ok(sd)
}

/// Greedy-allocator tolerance: half the population std of the phases.
pub fn half_std_tolerance(phases: &[f64]) -> SyncResult<f64> {
    Ok(0.5 * spread(phases)?)
}

/// Zero-mean, unit-variance copy of `values`.
pub fn standardize(values: &[f64]) -> SyncResult<Vec<f64>> {
    let sd = spread(values)?;
    let mu = mean(values);
    Ok(values.iter().map(|v| (v - mu) / sd).collect())
}
