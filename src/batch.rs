use log::{debug, warn};
use rayon::prelude::*;

use crate::analysis::{analyze_with, DiffractionResult, ExtremaFinder};
use crate::config::{AnalysisOptions, ExperimentParameters};
use crate::data::model::ProfileDataset;
use crate::error::Result;

/// Analysis of one stored profile.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Index of the record in the dataset.
    pub index: usize,
    pub label: String,
    pub result: Result<DiffractionResult>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Analyze the records at `indices` in parallel. Profiles are independent, so
/// each runs on its own rayon task; the output follows the order of `indices`.
pub fn analyze_dataset(
    finder: &dyn ExtremaFinder,
    dataset: &ProfileDataset,
    indices: &[usize],
    label_column: Option<&str>,
    params: &ExperimentParameters,
    options: &AnalysisOptions,
) -> Vec<BatchOutcome> {
    indices
        .par_iter()
        .filter_map(|&index| dataset.records.get(index).map(|rec| (index, rec)))
        .map(|(index, rec)| {
            let label = rec.label(label_column, index);
            let result = analyze_with(finder, &rec.profile, params, options);
            match &result {
                Ok(r) => debug!(
                    "{label}: {} minima, slit {:.4e} {}",
                    r.minima().len(),
                    r.slit_width(),
                    r.unit()
                ),
                Err(e) => warn!("{label}: {e}"),
            }
            BatchOutcome {
                index,
                label,
                result,
            }
        })
        .collect()
}

/// Successful outcomes only.
pub fn successes(outcomes: &[BatchOutcome]) -> impl Iterator<Item = (&BatchOutcome, &DiffractionResult)> {
    outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok().map(|r| (o, r)))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::model::{IntensityProfile, MetadataValue, ProfileRecord};
    use crate::error::Error;

    struct Fixed(Vec<usize>);

    impl ExtremaFinder for Fixed {
        fn find_peaks(&self, _signal: &[f64], _widths: &[f64]) -> Vec<usize> {
            self.0.clone()
        }
    }

    fn record(bright: usize, name: &str) -> ProfileRecord {
        let intensity: Vec<f64> = (0..50)
            .map(|i| match i {
                i if i == bright => 1.0,
                10 | 20 | 30 | 40 => 0.0,
                _ => 0.2,
            })
            .collect();
        let position = (0..50).map(|i| i as f64).collect();
        ProfileRecord {
            profile: IntensityProfile::new(position, intensity).unwrap(),
            metadata: BTreeMap::from([(
                "name".to_string(),
                MetadataValue::String(name.to_string()),
            )]),
        }
    }

    #[test]
    fn keeps_selection_order_and_per_profile_errors() {
        let ds = ProfileDataset::from_records(vec![
            record(25, "good"),
            record(45, "edge"),
            record(15, "other"),
        ]);
        let finder = Fixed(vec![10, 20, 30, 40]);
        let options = AnalysisOptions {
            dynamic_refine: false,
            ..Default::default()
        };
        let outcomes = analyze_dataset(
            &finder,
            &ds,
            &[2, 1, 0, 7],
            Some("name"),
            &ExperimentParameters::default(),
            &options,
        );

        let labels: Vec<&str> = outcomes.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["other", "edge", "good"]);
        assert!(outcomes[0].is_ok());
        assert!(matches!(
            outcomes[1].result,
            Err(Error::DetectionError { right: 0, .. })
        ));
        assert_eq!(successes(&outcomes).count(), 2);
    }
}
