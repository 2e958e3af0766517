use serde::Serialize;

use crate::data::model::IntensityProfile;
use crate::error::{Error, Result};

/// Index of the brightest sample (first one on ties). The principal order is
/// assumed to saturate the sensor, so this lands inside the central fringe.
pub fn saturation_index(intensity: &[f64]) -> usize {
    intensity
        .iter()
        .enumerate()
        .fold(0, |best, (i, &v)| if v > intensity[best] { i } else { best })
}

/// Geometry of the order-0 fringe, in sample indices of the raw profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CentralFringe {
    /// Brightest sample.
    pub saturation: usize,
    /// Nearest minimum left of `saturation`.
    pub left_minimum: usize,
    /// Nearest minimum right of `saturation`.
    pub right_minimum: usize,
    /// `right_minimum - left_minimum`.
    pub width: usize,
    /// Midpoint of the two central minima; a half-sample midpoint truncates.
    pub center: usize,
    /// Raw position of `center`; subtracted from every position sample.
    pub origin: f64,
}

impl CentralFringe {
    /// Split `minima` around the saturation point and take the innermost pair.
    pub fn locate(minima: &[usize], profile: &IntensityProfile) -> Result<Self> {
        let saturation = saturation_index(profile.intensity());
        let left = minima.iter().filter(|&&i| i < saturation).max();
        let right = minima.iter().filter(|&&i| i > saturation).min();

        let (Some(&left_minimum), Some(&right_minimum)) = (left, right) else {
            return Err(Error::DetectionError {
                left: minima.iter().filter(|&&i| i < saturation).count(),
                right: minima.iter().filter(|&&i| i > saturation).count(),
                saturation,
            });
        };

        let width = right_minimum - left_minimum;
        let center = left_minimum + width / 2;
        Ok(Self {
            saturation,
            left_minimum,
            right_minimum,
            width,
            center,
            origin: profile.position()[center],
        })
    }
}

/// Minima positions on either side of the new origin, nearest first.
/// Left distances are stored as positive values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MinimaSet {
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

impl MinimaSet {
    /// `positions` are re-centered minima in sample order. A minimum sitting
    /// exactly on the origin belongs to neither side.
    pub fn split(positions: &[f64]) -> Self {
        Self {
            left: positions
                .iter()
                .rev()
                .filter(|&&p| p < 0.0)
                .map(|p| -p)
                .collect(),
            right: positions.iter().copied().filter(|&p| p > 0.0).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(intensity: Vec<f64>) -> IntensityProfile {
        let position = (0..intensity.len()).map(|i| i as f64 * 0.5).collect();
        IntensityProfile::new(position, intensity).unwrap()
    }

    #[test]
    fn saturation_takes_the_first_maximum() {
        assert_eq!(saturation_index(&[0.1, 0.9, 0.3, 0.9]), 1);
    }

    #[test]
    fn innermost_pair_defines_the_center() {
        let mut y = vec![0.2; 21];
        y[10] = 1.0;
        let fringe = CentralFringe::locate(&[1, 4, 7, 14, 18], &profile(y)).unwrap();
        assert_eq!(fringe.saturation, 10);
        assert_eq!((fringe.left_minimum, fringe.right_minimum), (7, 14));
        assert_eq!(fringe.width, 7);
        // 7 + 3.5 truncates to 10.
        assert_eq!(fringe.center, 10);
        assert_eq!(fringe.origin, 5.0);
    }

    #[test]
    fn one_sided_minima_fail_with_counts() {
        let mut y = vec![0.2; 10];
        y[9] = 1.0;
        assert_eq!(
            CentralFringe::locate(&[2, 5], &profile(y)),
            Err(Error::DetectionError {
                left: 2,
                right: 0,
                saturation: 9
            })
        );
    }

    #[test]
    fn split_orders_nearest_first() {
        let set = MinimaSet::split(&[-3.0, -2.0, -1.0, 0.0, 1.0, 2.5]);
        assert_eq!(set.left, vec![1.0, 2.0, 3.0]);
        assert_eq!(set.right, vec![1.0, 2.5]);
        assert_eq!(set.len(), 5);
    }
}
