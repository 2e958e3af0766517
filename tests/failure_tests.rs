//! Inputs the pipeline must refuse, and the error each one produces.

mod profile_fixtures;

use profile_fixtures::SincProfile;
use slit_fringe::{
    analyze, ingest, AnalysisOptions, DetectionPass, Error, ExperimentParameters,
};

#[test]
fn mismatched_arrays_are_rejected_at_ingest() {
    let err = ingest(&[0.0, 1.0, 2.0], &[1.0, 0.5]).unwrap_err();
    assert_eq!(
        err,
        Error::ShapeMismatch {
            positions: 3,
            intensities: 2
        }
    );
}

#[test]
fn ingest_leaves_the_caller_arrays_alone() {
    let position = vec![-1.0, 0.0, 1.0];
    let intensity = vec![0.0, 1.0, 0.0];
    let profile = ingest(&position, &intensity).unwrap();
    assert_eq!(profile.position(), position.as_slice());
    assert_eq!(profile.intensity(), intensity.as_slice());
    assert_eq!(position, vec![-1.0, 0.0, 1.0]);
}

#[test]
fn non_finite_samples_are_rejected() {
    let err = ingest(&[0.0, 1.0], &[0.5, f64::NAN]).unwrap_err();
    assert!(matches!(err, Error::NonFiniteSample { index: 1, .. }), "{err:?}");
}

#[test]
fn flat_profile_has_no_minima() {
    let n = 500;
    let position: Vec<f64> = (0..n).map(|i| i as f64 * 1e-4).collect();
    let profile = ingest(&position, &vec![0.0; n]).unwrap();
    let err = analyze(&profile, &ExperimentParameters::default(), &AnalysisOptions::default())
        .unwrap_err();
    assert!(
        matches!(
            err,
            Error::NoPeaksFound {
                pass: DetectionPass::Coarse,
                ..
            }
        ),
        "{err:?}"
    );
}

#[test]
fn saturation_at_the_edge_leaves_one_side_empty() {
    // Periodic dips with the brightest sample at the right edge: every
    // minimum lies left of it.
    let n = 1001;
    let position: Vec<f64> = (0..n).map(|i| i as f64 * 1e-4).collect();
    let mut intensity: Vec<f64> = (0..n)
        .map(|i| 1.0 - (2.0 * std::f64::consts::PI * i as f64 / 100.0).cos())
        .collect();
    intensity[n - 1] = 10.0;
    let profile = ingest(&position, &intensity).unwrap();

    let err = analyze(&profile, &ExperimentParameters::default(), &AnalysisOptions::default())
        .unwrap_err();
    match err {
        Error::DetectionError {
            left,
            right,
            saturation,
        } => {
            assert_eq!(saturation, n - 1);
            assert_eq!(right, 0);
            assert!(left > 0);
        }
        other => panic!("expected a detection error, got {other:?}"),
    }
}

#[test]
fn invalid_experiment_parameters_are_rejected_before_detection() {
    let profile = SincProfile::default().build();
    let params = ExperimentParameters {
        wavelength: 0.0,
        ..Default::default()
    };
    let err = analyze(&profile, &params, &AnalysisOptions::default()).unwrap_err();
    assert!(
        matches!(err, Error::InvalidParameter { name: "wavelength", .. }),
        "{err:?}"
    );

    let options = AnalysisOptions {
        threshold: 1.5,
        ..Default::default()
    };
    let err = analyze(&profile, &ExperimentParameters::default(), &options).unwrap_err();
    assert!(
        matches!(err, Error::InvalidParameter { name: "threshold", .. }),
        "{err:?}"
    );
}
