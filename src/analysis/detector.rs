use crate::error::{DetectionPass, Error, Result};

// ---------------------------------------------------------------------------
// Strategy seam
// ---------------------------------------------------------------------------

/// Locates local maxima of a sampled signal whose characteristic width lies
/// in a given scale set.
///
/// Implementations return ascending, deduplicated sample indices. Minima are
/// found by handing the negated signal to the same finder.
pub trait ExtremaFinder: Sync {
    fn find_peaks(&self, signal: &[f64], widths: &[f64]) -> Vec<usize>;
}

// ---------------------------------------------------------------------------
// Width ranges
// ---------------------------------------------------------------------------

/// Expected peak half-width range `[lo, hi)`, in samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidthRange {
    pub lo: f64,
    pub hi: f64,
}

impl WidthRange {
    /// Seed range from the samples brighter than `threshold × max`: half of
    /// that count is the expected half-width, searched at ±25 %.
    pub fn from_threshold(intensity: &[f64], threshold: f64) -> Self {
        let max = intensity.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let cut = max * threshold;
        let half_width = intensity.iter().filter(|&&v| v > cut).count() as f64 / 2.0;
        Self {
            lo: half_width * 0.75,
            hi: half_width * 1.25,
        }
    }

    /// Narrower range informed by the central fringe, which spans two fringe
    /// spacings: half-width `central_width / 8`, searched over `[w/2, w)`.
    pub fn from_central_width(central_width: usize) -> Self {
        let half_width = central_width as f64 / 8.0;
        Self {
            lo: half_width * 0.5,
            hi: half_width,
        }
    }

    /// Unit-step scale set `lo, lo + 1, ...` below `hi`. A collapsed range
    /// still yields `lo`; every width is at least one sample.
    pub fn widths(&self) -> Vec<f64> {
        let span = self.hi - self.lo;
        let count = if span > 0.0 { span.ceil() as usize } else { 0 };
        let widths: Vec<f64> = if count == 0 {
            vec![self.lo]
        } else {
            (0..count).map(|k| self.lo + k as f64).collect()
        };
        widths.into_iter().map(|w| w.max(1.0)).collect()
    }
}

// ---------------------------------------------------------------------------
// PeakDetector
// ---------------------------------------------------------------------------

/// One configured minimum search: a finder strategy plus a width range.
/// The coarse and the refined pass are two detectors differing only in range.
pub struct PeakDetector<'a> {
    finder: &'a dyn ExtremaFinder,
    range: WidthRange,
}

impl<'a> PeakDetector<'a> {
    pub fn new(finder: &'a dyn ExtremaFinder, range: WidthRange) -> Self {
        Self { finder, range }
    }

    /// Ascending indices of dark-fringe samples.
    ///
    /// The finder runs on `-intensity`; each reported index then descends to
    /// the bottom of the dip it sits in, since ridge positions lean toward the
    /// shallow side of an asymmetric dip.
    pub fn find_minima(&self, intensity: &[f64], pass: DetectionPass) -> Result<Vec<usize>> {
        let inverted: Vec<f64> = intensity.iter().map(|v| -v).collect();
        let raw = self.finder.find_peaks(&inverted, &self.range.widths());

        let mut minima: Vec<usize> = raw
            .into_iter()
            .filter(|&i| i < intensity.len())
            .map(|i| descend_to_minimum(intensity, i))
            .collect();
        minima.sort_unstable();
        minima.dedup();

        if minima.is_empty() {
            return Err(Error::NoPeaksFound {
                pass,
                lo: self.range.lo,
                hi: self.range.hi,
            });
        }
        Ok(minima)
    }
}

/// Follow the steeper downhill neighbour from `index` until neither
/// neighbour is darker. Ties go left.
fn descend_to_minimum(intensity: &[f64], mut index: usize) -> usize {
    loop {
        let here = intensity[index];
        let left = index.checked_sub(1).map(|i| (i, intensity[i]));
        let right = intensity.get(index + 1).map(|&v| (index + 1, v));
        let next = [left, right]
            .into_iter()
            .flatten()
            .filter(|&(_, v)| v < here)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        match next {
            Some((i, _)) => index = i,
            None => return index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reports a fixed list of indices whatever the input.
    struct Scripted(Vec<usize>);

    impl ExtremaFinder for Scripted {
        fn find_peaks(&self, _signal: &[f64], _widths: &[f64]) -> Vec<usize> {
            self.0.clone()
        }
    }

    #[test]
    fn threshold_seed_uses_half_the_bright_count() {
        let mut y = vec![0.0; 100];
        for v in &mut y[40..60] {
            *v = 1.0;
        }
        let range = WidthRange::from_threshold(&y, 0.5);
        assert_eq!(range, WidthRange { lo: 7.5, hi: 12.5 });
        assert_eq!(range.widths(), vec![7.5, 8.5, 9.5, 10.5, 11.5]);
    }

    #[test]
    fn central_width_range() {
        let range = WidthRange::from_central_width(536);
        assert_eq!(range, WidthRange { lo: 33.5, hi: 67.0 });
        assert_eq!(range.widths().len(), 34);
    }

    #[test]
    fn collapsed_range_still_searches_one_width() {
        let range = WidthRange { lo: 0.375, hi: 0.625 };
        assert_eq!(range.widths(), vec![1.0]);
        let empty = WidthRange { lo: 0.0, hi: 0.0 };
        assert_eq!(empty.widths(), vec![1.0]);
    }

    #[test]
    fn minima_descend_and_deduplicate() {
        let y = [5.0, 4.0, 1.0, 4.0, 5.0, 4.0, 0.5, 4.0, 5.0];
        let finder = Scripted(vec![1, 3, 5]);
        let detector = PeakDetector::new(&finder, WidthRange { lo: 1.0, hi: 1.0 });
        let minima = detector.find_minima(&y, DetectionPass::Coarse).unwrap();
        assert_eq!(minima, vec![2, 6]);
    }

    #[test]
    fn descent_stops_at_the_nearest_dip() {
        // The deeper zero at 7 lies inside the search range but across a
        // bright lobe from the reported index.
        let y = [0.9, 0.5, 0.1, 0.6, 1.0, 0.6, 0.3, 0.0, 0.4];
        let finder = Scripted(vec![3]);
        let detector = PeakDetector::new(&finder, WidthRange { lo: 4.0, hi: 6.0 });
        assert_eq!(detector.find_minima(&y, DetectionPass::Coarse).unwrap(), vec![2]);
    }

    #[test]
    fn descent_follows_the_steeper_side() {
        assert_eq!(descend_to_minimum(&[0.0, 0.5, 1.0, 0.2, 0.1], 2), 4);
        assert_eq!(descend_to_minimum(&[0.3, 0.5, 0.5, 0.5], 2), 2);
        assert_eq!(descend_to_minimum(&[0.0, 0.5, 0.9, 0.5, 0.0], 2), 0);
    }

    #[test]
    fn empty_search_reports_the_pass() {
        let finder = Scripted(Vec::new());
        let detector = PeakDetector::new(&finder, WidthRange { lo: 2.0, hi: 4.0 });
        assert_eq!(
            detector.find_minima(&[1.0, 0.0, 1.0], DetectionPass::Refined),
            Err(Error::NoPeaksFound {
                pass: DetectionPass::Refined,
                lo: 2.0,
                hi: 4.0
            })
        );
    }
}
