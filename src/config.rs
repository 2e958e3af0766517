use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Experiment parameters
// ---------------------------------------------------------------------------

/// Physical setup of one measurement. Immutable for the duration of an
/// analysis; the unit label is carried through for reporting only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentParameters {
    /// Laser wavelength, in `unit`.
    pub wavelength: f64,
    /// Slit-to-screen distance, in `unit`.
    pub screen_distance: f64,
    /// Name of the distance unit used by positions, wavelength and distance.
    pub unit: String,
}

impl Default for ExperimentParameters {
    fn default() -> Self {
        Self {
            wavelength: 670e-9,
            screen_distance: 2.0,
            unit: "m".to_string(),
        }
    }
}

impl ExperimentParameters {
    pub fn new(wavelength: f64, screen_distance: f64, unit: impl Into<String>) -> Result<Self> {
        let params = Self {
            wavelength,
            screen_distance,
            unit: unit.into(),
        };
        params.validate()?;
        Ok(params)
    }

    /// Both lengths must be finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        positive("wavelength", self.wavelength)?;
        positive("screen_distance", self.screen_distance)
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter { name, value })
    }
}

// ---------------------------------------------------------------------------
// Analysis options
// ---------------------------------------------------------------------------

/// Tuning knobs of the pipeline. Callers retry with different values when an
/// analysis fails; the pipeline itself never does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Fraction of the maximum intensity used to seed the peak-width estimate.
    pub threshold: f64,
    /// Re-run the minimum search with a window derived from the central fringe.
    pub dynamic_refine: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            dynamic_refine: true,
        }
    }
}

impl AnalysisOptions {
    pub fn validate(&self) -> Result<()> {
        if self.threshold.is_finite() && self.threshold > 0.0 && self.threshold < 1.0 {
            Ok(())
        } else {
            Err(Error::InvalidParameter {
                name: "threshold",
                value: self.threshold,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Config file
// ---------------------------------------------------------------------------

/// On-disk configuration. Every field is optional:
///
/// ```json
/// {
///   "experiment": { "wavelength": 6.7e-7, "screen_distance": 2.0, "unit": "m" },
///   "analysis": { "threshold": 0.5, "dynamic_refine": true }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub experiment: ExperimentParameters,
    pub analysis: AnalysisOptions,
}

impl Config {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.experiment.validate()?;
        self.analysis.validate()
    }
}
