use std::collections::{BTreeMap, BTreeSet};

use anyhow::{bail, Result};

use super::model::{MetadataValue, ProfileDataset};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per column
// ---------------------------------------------------------------------------

/// Per-column selection: maps column_name → set of accepted values.
/// An empty selection accepts every profile.
pub type Selection = BTreeMap<String, BTreeSet<MetadataValue>>;

/// Parse `column=value` predicates. Repeating a column ORs its values,
/// different columns AND together.
pub fn parse_selection<S: AsRef<str>>(predicates: &[S]) -> Result<Selection> {
    let mut selection = Selection::new();
    for predicate in predicates {
        let predicate = predicate.as_ref();
        let Some((column, value)) = predicate.split_once('=') else {
            bail!("Invalid selection '{predicate}': expected column=value");
        };
        let column = column.trim();
        if column.is_empty() {
            bail!("Invalid selection '{predicate}': empty column name");
        }
        selection
            .entry(column.to_string())
            .or_default()
            .insert(MetadataValue::guess(value.trim()));
    }
    Ok(selection)
}

/// Reject predicates on columns that no record in `dataset` carries.
pub fn check_columns(dataset: &ProfileDataset, selection: &Selection) -> Result<()> {
    let unknown: Vec<&str> = selection
        .keys()
        .filter(|col| !dataset.column_names.contains(*col))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        bail!(
            "Unknown metadata column(s) {}; available: {}",
            unknown.join(", "),
            dataset.column_names.join(", ")
        );
    }
    Ok(())
}

/// Return indices of records that pass all predicates.
///
/// A record passes a column predicate when:
/// * its value for that column is in the accepted set, or
/// * it lacks the column and `Null` is accepted.
///
/// Integer and float values compare numerically, so `slit_um=50` matches a
/// stored `50.0`.
pub fn selected_indices(dataset: &ProfileDataset, selection: &Selection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            selection.iter().all(|(col, accepted)| {
                let value = rec.metadata.get(col).unwrap_or(&MetadataValue::Null);
                accepted.iter().any(|a| matches_value(a, value))
            })
        })
        .map(|(i, _)| i)
        .collect()
}

fn matches_value(accepted: &MetadataValue, value: &MetadataValue) -> bool {
    match (accepted.as_f64(), value.as_f64()) {
        (Some(a), Some(v)) => a == v,
        _ => accepted == value,
    }
}
