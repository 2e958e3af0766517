//! Ricker-wavelet continuous wavelet transform peak search.
//!
//! The signal is convolved with a Ricker ("Mexican hat") wavelet at every
//! width of the scale set. Relative maxima of each scale row are chained into
//! ridge lines from the widest scale down to the narrowest; a ridge that is
//! long enough and stands out of the local noise floor marks a peak at the
//! column where it ends on the narrowest scale.

use super::detector::ExtremaFinder;

/// Default ridge-line CWT strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RickerCwt {
    /// Minimum ratio between the ridge response and the local noise floor.
    pub min_snr: f64,
    /// Percentile of the narrowest-scale row taken as the noise floor.
    pub noise_percentile: f64,
}

impl Default for RickerCwt {
    fn default() -> Self {
        Self {
            min_snr: 1.0,
            noise_percentile: 10.0,
        }
    }
}

impl ExtremaFinder for RickerCwt {
    fn find_peaks(&self, signal: &[f64], widths: &[f64]) -> Vec<usize> {
        if signal.len() < 3 || widths.is_empty() {
            return Vec::new();
        }
        let rows = transform(signal, widths);
        let max_distances: Vec<f64> = widths.iter().map(|w| w / 4.0).collect();
        let gap_thresh = widths[0].ceil() as usize;

        let ridges = ridge_lines(&rows, &max_distances, gap_thresh);
        let mut peaks = self.filter_ridges(&rows, &ridges);
        peaks.sort_unstable();
        peaks.dedup();
        peaks
    }
}

impl RickerCwt {
    fn filter_ridges(&self, rows: &[Vec<f64>], ridges: &[Ridge]) -> Vec<usize> {
        let n = rows[0].len();
        let min_length = rows.len().div_ceil(4);
        let window = n.div_ceil(20);
        let (half, odd) = (window / 2, window % 2);
        let narrowest = &rows[0];

        ridges
            .iter()
            .filter(|ridge| ridge.rows.len() >= min_length)
            .filter_map(|ridge| {
                let (row, col) = (ridge.rows[0], ridge.cols[0]);
                let start = col.saturating_sub(half);
                let end = (col + half + odd).min(n);
                let noise = percentile(&narrowest[start..end], self.noise_percentile);
                let response = rows[row][col];
                let snr = if noise == 0.0 {
                    if response == 0.0 {
                        0.0
                    } else {
                        f64::INFINITY
                    }
                } else {
                    (response / noise).abs()
                };
                (snr >= self.min_snr).then_some(col)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Transform
// ---------------------------------------------------------------------------

/// Ricker wavelet sampled on `points` samples centred in the window.
pub fn ricker(points: usize, a: f64) -> Vec<f64> {
    let amplitude = 2.0 / ((3.0 * a).sqrt() * std::f64::consts::PI.powf(0.25));
    let centre = (points as f64 - 1.0) / 2.0;
    let wsq = a * a;
    (0..points)
        .map(|i| {
            let xsq = (i as f64 - centre).powi(2);
            amplitude * (1.0 - xsq / wsq) * (-xsq / (2.0 * wsq)).exp()
        })
        .collect()
}

/// Convolution zero-padded at both ends, cropped to the length of `data`.
/// `kernel` must not be longer than `data`.
fn convolve_same(data: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = data.len();
    let m = kernel.len();
    let offset = (m - 1) / 2;
    (0..n)
        .map(|i| {
            let j = i + offset;
            let lo = j.saturating_sub(n - 1);
            let hi = j.min(m - 1);
            (lo..=hi).map(|t| data[j - t] * kernel[t]).sum()
        })
        .collect()
}

/// One row per width, each as long as `signal`.
pub fn transform(signal: &[f64], widths: &[f64]) -> Vec<Vec<f64>> {
    widths
        .iter()
        .map(|&w| {
            let points = ((10.0 * w).ceil() as usize).clamp(1, signal.len());
            convolve_same(signal, &ricker(points, w))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Ridge lines
// ---------------------------------------------------------------------------

/// A chain of relative maxima across scales, ordered by ascending row.
#[derive(Debug, Clone, Default, PartialEq)]
struct Ridge {
    rows: Vec<usize>,
    cols: Vec<usize>,
    gap: usize,
}

/// Strict interior relative maxima of a row.
fn relative_maxima(row: &[f64]) -> Vec<usize> {
    (1..row.len().saturating_sub(1))
        .filter(|&i| row[i] > row[i - 1] && row[i] > row[i + 1])
        .collect()
}

fn ridge_lines(rows: &[Vec<f64>], max_distances: &[f64], gap_thresh: usize) -> Vec<Ridge> {
    let maxima: Vec<Vec<usize>> = rows.iter().map(|r| relative_maxima(r)).collect();
    let Some(start) = maxima.iter().rposition(|m| !m.is_empty()) else {
        return Vec::new();
    };

    let mut open: Vec<Ridge> = maxima[start]
        .iter()
        .map(|&col| Ridge {
            rows: vec![start],
            cols: vec![col],
            gap: 0,
        })
        .collect();
    let mut closed = Vec::new();

    for row in (0..start).rev() {
        for ridge in &mut open {
            ridge.gap += 1;
        }
        // Ridges appended below are not candidates within the same row.
        let prev_cols: Vec<usize> = open.iter().map(|r| r.cols[r.cols.len() - 1]).collect();

        for &col in &maxima[row] {
            let closest = prev_cols
                .iter()
                .enumerate()
                .map(|(k, &c)| (k, col.abs_diff(c)))
                .min_by_key(|&(_, d)| d)
                .filter(|&(_, d)| d as f64 <= max_distances[row]);

            match closest {
                Some((k, _)) => {
                    let ridge = &mut open[k];
                    ridge.rows.push(row);
                    ridge.cols.push(col);
                    ridge.gap = 0;
                }
                None => open.push(Ridge {
                    rows: vec![row],
                    cols: vec![col],
                    gap: 0,
                }),
            }
        }

        for k in (0..open.len()).rev() {
            if open[k].gap > gap_thresh {
                closed.push(open.remove(k));
            }
        }
    }

    closed
        .into_iter()
        .chain(open)
        .map(|mut ridge| {
            ridge.rows.reverse();
            ridge.cols.reverse();
            ridge
        })
        .collect()
}

/// Linearly interpolated percentile of `values` (`p` in 0..=100).
fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let pos = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
