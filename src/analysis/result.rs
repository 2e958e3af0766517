use serde::Serialize;

use super::center::{CentralFringe, MinimaSet};
use super::spacing::SpacingEstimate;
use crate::data::model::IntensityProfile;

/// Outcome of one analysis call. Immutable; a later call produces a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffractionResult {
    pub(crate) profile: IntensityProfile,
    pub(crate) center: CentralFringe,
    pub(crate) minima_indices: Vec<usize>,
    pub(crate) minima: Vec<f64>,
    pub(crate) minima_set: MinimaSet,
    pub(crate) spacing: SpacingEstimate,
    pub(crate) slit_width: f64,
    pub(crate) unit: String,
    pub(crate) refined: bool,
}

impl DiffractionResult {
    /// Input profile with the position axis shifted onto the central maximum.
    pub fn profile(&self) -> &IntensityProfile {
        &self.profile
    }

    pub fn center(&self) -> &CentralFringe {
        &self.center
    }

    /// Sample indices of the dark fringes used for the spacing estimate.
    pub fn minima_indices(&self) -> &[usize] {
        &self.minima_indices
    }

    /// Re-centered positions of the dark fringes, in sample order.
    pub fn minima(&self) -> &[f64] {
        &self.minima
    }

    pub fn minima_set(&self) -> &MinimaSet {
        &self.minima_set
    }

    pub fn spacing(&self) -> &SpacingEstimate {
        &self.spacing
    }

    pub fn slit_width(&self) -> f64 {
        self.slit_width
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Whether the minima come from the refined second pass.
    pub fn refined(&self) -> bool {
        self.refined
    }

    /// Spacing samples that survived filtering.
    pub fn fringe_count(&self) -> usize {
        self.spacing.count
    }

    /// Distance from the center to the first dark fringe on the right.
    pub fn first_order_spacing(&self) -> Option<f64> {
        self.minima_set.right.first().copied()
    }
}
