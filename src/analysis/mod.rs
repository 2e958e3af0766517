//! Fraunhofer single-slit analysis.
//!
//! ```text
//!   position, intensity
//!        │ ingest
//!        ▼
//!   IntensityProfile ──► PeakDetector (coarse) ──► CentralFringe
//!                                                      │ re-center
//!                              PeakDetector (refined) ◄┘ (optional)
//!                                      │
//!                                      ▼
//!                      spacing::estimate ──► slit::slit_width
//!                                      │
//!                                      ▼
//!                              DiffractionResult
//! ```
//!
//! Every stage is a pure function of the previous stage's output. Nothing in
//! here logs or touches the filesystem.

pub mod center;
pub mod cwt;
pub mod detector;
pub mod result;
pub mod slit;
pub mod spacing;

pub use center::{CentralFringe, MinimaSet};
pub use cwt::RickerCwt;
pub use detector::{ExtremaFinder, PeakDetector, WidthRange};
pub use result::DiffractionResult;
pub use spacing::SpacingEstimate;

use crate::config::{AnalysisOptions, ExperimentParameters};
use crate::data::model::IntensityProfile;
use crate::error::{DetectionPass, Result};

/// Validate a raw (position, intensity) pair into an owned profile. The
/// caller's slices are copied, never modified.
pub fn ingest(position: &[f64], intensity: &[f64]) -> Result<IntensityProfile> {
    IntensityProfile::new(position.to_vec(), intensity.to_vec())
}

/// Analyze `profile` with the default Ricker-CWT minimum search.
pub fn analyze(
    profile: &IntensityProfile,
    params: &ExperimentParameters,
    options: &AnalysisOptions,
) -> Result<DiffractionResult> {
    analyze_with(&RickerCwt::default(), profile, params, options)
}

/// Analyze `profile` with a caller-supplied extremum search strategy.
///
/// The refined pass reuses the center fixed by the coarse pass; only the
/// minima are replaced.
pub fn analyze_with(
    finder: &dyn ExtremaFinder,
    profile: &IntensityProfile,
    params: &ExperimentParameters,
    options: &AnalysisOptions,
) -> Result<DiffractionResult> {
    params.validate()?;
    options.validate()?;
    let intensity = profile.intensity();

    let coarse = PeakDetector::new(
        finder,
        WidthRange::from_threshold(intensity, options.threshold),
    );
    let mut minima_indices = coarse.find_minima(intensity, DetectionPass::Coarse)?;

    let center = CentralFringe::locate(&minima_indices, profile)?;
    let recentered = profile.shifted(center.origin);

    if options.dynamic_refine {
        let refined = PeakDetector::new(finder, WidthRange::from_central_width(center.width));
        minima_indices = refined.find_minima(intensity, DetectionPass::Refined)?;
    }

    let minima: Vec<f64> = minima_indices
        .iter()
        .map(|&i| recentered.position()[i])
        .collect();
    let minima_set = MinimaSet::split(&minima);
    let spacing = spacing::estimate(&minima)?;
    let slit_width = slit::slit_width(params, spacing.mean)?;

    Ok(DiffractionResult {
        profile: recentered,
        center,
        minima_indices,
        minima,
        minima_set,
        spacing,
        slit_width,
        unit: params.unit.clone(),
        refined: options.dynamic_refine,
    })
}
