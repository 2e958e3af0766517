//! Measurement of single-slit Fraunhofer diffraction patterns.
//!
//! Given a sampled intensity-vs-position profile, [`analysis::analyze`]
//! locates the dark fringes, re-centers the pattern on its principal maximum,
//! estimates the inter-fringe spacing and derives the slit width.

pub mod analysis;
pub mod batch;
pub mod config;
pub mod data;
pub mod error;
pub mod report;

pub use analysis::{analyze, analyze_with, ingest, DiffractionResult};
pub use config::{AnalysisOptions, Config, ExperimentParameters};
pub use data::model::IntensityProfile;
pub use error::{DetectionPass, Error, Result};
