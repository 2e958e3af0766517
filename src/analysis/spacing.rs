use serde::Serialize;

use crate::error::{Error, Result};

/// Gaps wider than this multiple of the raw mean hide an undetected fringe.
pub const MISSED_FRINGE_FACTOR: f64 = 1.5;
/// Spacing samples outside `(LOWER, UPPER) × raw mean` are discarded.
pub const LOWER_BOUND_FACTOR: f64 = 0.5;
pub const UPPER_BOUND_FACTOR: f64 = 1.5;
/// Relative uncertainty of a single spacing sample.
pub const RELATIVE_ERROR: f64 = 0.25;

/// Mean inter-fringe spacing and its uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpacingEstimate {
    pub mean: f64,
    pub error: f64,
    /// Spacing samples retained after filtering.
    pub count: usize,
}

impl SpacingEstimate {
    /// `error = mean × 0.25 / count`, so it shrinks as samples accumulate.
    pub fn new(mean: f64, count: usize) -> Self {
        Self {
            mean,
            error: mean.abs() * RELATIVE_ERROR / count as f64,
            count,
        }
    }
}

/// Robust mean spacing of dark fringes at `positions` (any order).
///
/// Gaps wider than 1.5× the raw mean are treated as a missed fringe: half the
/// gap is added to the working set once for each of the two intervals the
/// missing fringe would create. The working set is then trimmed to
/// `(0.5, 1.5) × raw mean`.
pub fn estimate(positions: &[f64]) -> Result<SpacingEstimate> {
    if positions.len() < 2 {
        return Err(Error::DegenerateSpacing {
            minima: positions.len(),
            retained: 0,
        });
    }
    let mut sorted = positions.to_vec();
    sorted.sort_by(f64::total_cmp);

    let gaps: Vec<f64> = sorted.windows(2).map(|w| w[1] - w[0]).collect();
    let raw_mean = gaps.iter().sum::<f64>() / gaps.len() as f64;

    let halves: Vec<f64> = gaps
        .iter()
        .filter(|&&g| g > raw_mean * MISSED_FRINGE_FACTOR)
        .map(|g| g / 2.0)
        .collect();

    let lower = raw_mean * LOWER_BOUND_FACTOR;
    let upper = raw_mean * UPPER_BOUND_FACTOR;
    let retained: Vec<f64> = gaps
        .iter()
        .chain(&halves)
        .chain(&halves)
        .copied()
        .filter(|&g| lower < g && g < upper)
        .collect();

    if retained.is_empty() {
        return Err(Error::DegenerateSpacing {
            minima: positions.len(),
            retained: 0,
        });
    }
    let mean = retained.iter().sum::<f64>() / retained.len() as f64;
    Ok(SpacingEstimate::new(mean, retained.len()))
}
