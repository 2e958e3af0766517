use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// IntensityProfile – the two vectors the analysis consumes
// ---------------------------------------------------------------------------

/// A sampled intensity-vs-position profile across the diffraction pattern.
///
/// Construction is the ingest stage: both vectors must be non-empty, of equal
/// length and finite. The analysis never mutates a profile; re-centering
/// produces a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityProfile {
    position: Vec<f64>,
    intensity: Vec<f64>,
}

impl IntensityProfile {
    pub fn new(position: Vec<f64>, intensity: Vec<f64>) -> Result<Self> {
        if position.len() != intensity.len() || position.is_empty() {
            return Err(Error::ShapeMismatch {
                positions: position.len(),
                intensities: intensity.len(),
            });
        }
        if let Some(index) = position.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFiniteSample {
                axis: "position",
                index,
            });
        }
        if let Some(index) = intensity.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFiniteSample {
                axis: "intensity",
                index,
            });
        }
        Ok(Self {
            position,
            intensity,
        })
    }

    pub fn position(&self) -> &[f64] {
        &self.position
    }

    pub fn intensity(&self) -> &[f64] {
        &self.intensity
    }

    /// Copy of this profile with `origin` subtracted from every position.
    pub fn shifted(&self, origin: f64) -> Self {
        Self {
            position: self.position.iter().map(|&x| x - origin).collect(),
            intensity: self.intensity.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// MetadataValue – a single cell in a metadata column
// ---------------------------------------------------------------------------

/// A dynamically-typed metadata value attached to a stored profile
/// (sample name, nominal slit, laser, capture id, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put MetadataValue in BTreeSet --

impl Eq for MetadataValue {}

impl PartialOrd for MetadataValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MetadataValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use MetadataValue::*;
        fn rank(v: &MetadataValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "{s}"),
            MetadataValue::Integer(i) => write!(f, "{i}"),
            MetadataValue::Float(v) => write!(f, "{v}"),
            MetadataValue::Bool(b) => write!(f, "{b}"),
            MetadataValue::Null => write!(f, "<null>"),
        }
    }
}

impl MetadataValue {
    /// Interpret free text (CSV cell, CLI predicate) with the narrowest type
    /// that parses: empty → Null, then integer, float, bool, string.
    pub fn guess(s: &str) -> Self {
        if s.is_empty() {
            return MetadataValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return MetadataValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return MetadataValue::Float(f);
        }
        if s == "true" || s == "false" {
            return MetadataValue::Bool(s == "true");
        }
        MetadataValue::String(s.to_string())
    }

    /// Numeric view used for cross-type comparisons.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Float(v) => Some(*v),
            MetadataValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ProfileRecord / ProfileDataset – stored captures
// ---------------------------------------------------------------------------

/// One stored capture: the profile plus its metadata columns.
#[derive(Debug, Clone)]
pub struct ProfileRecord {
    pub profile: IntensityProfile,
    /// Dynamic metadata columns: column_name → value.
    pub metadata: BTreeMap<String, MetadataValue>,
}

impl ProfileRecord {
    /// Human-readable label: the given column's value, else `profile {index}`.
    pub fn label(&self, column: Option<&str>, index: usize) -> String {
        column
            .and_then(|col| self.metadata.get(col))
            .map(|v| v.to_string())
            .unwrap_or_else(|| format!("profile {index}"))
    }
}

/// A loaded file of captures with the union of their metadata columns.
#[derive(Debug, Clone)]
pub struct ProfileDataset {
    pub records: Vec<ProfileRecord>,
    /// Sorted metadata column names seen in any record.
    pub column_names: Vec<String>,
}

impl ProfileDataset {
    pub fn from_records(records: Vec<ProfileRecord>) -> Self {
        let columns: BTreeSet<&String> =
            records.iter().flat_map(|rec| rec.metadata.keys()).collect();
        let column_names = columns.into_iter().cloned().collect();
        ProfileDataset {
            records,
            column_names,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingest_rejects_length_mismatch_and_empty() {
        assert_eq!(
            IntensityProfile::new(vec![0.0, 1.0], vec![1.0]),
            Err(Error::ShapeMismatch {
                positions: 2,
                intensities: 1
            })
        );
        assert!(matches!(
            IntensityProfile::new(Vec::new(), Vec::new()),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn ingest_rejects_non_finite_samples() {
        assert_eq!(
            IntensityProfile::new(vec![0.0, 1.0, 2.0], vec![1.0, f64::NAN, 0.0]),
            Err(Error::NonFiniteSample {
                axis: "intensity",
                index: 1
            })
        );
    }

    #[test]
    fn shifted_leaves_source_untouched() {
        let p = IntensityProfile::new(vec![1.0, 2.0, 3.0], vec![0.1, 0.9, 0.2]).unwrap();
        let q = p.shifted(2.0);
        assert_eq!(q.position(), &[-1.0, 0.0, 1.0]);
        assert_eq!(q.intensity(), p.intensity());
        assert_eq!(p.position(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn guess_picks_narrowest_type() {
        assert_eq!(MetadataValue::guess(""), MetadataValue::Null);
        assert_eq!(MetadataValue::guess("42"), MetadataValue::Integer(42));
        assert_eq!(MetadataValue::guess("1.5e-4"), MetadataValue::Float(1.5e-4));
        assert_eq!(MetadataValue::guess("true"), MetadataValue::Bool(true));
        assert_eq!(
            MetadataValue::guess("red"),
            MetadataValue::String("red".to_string())
        );
    }

    #[test]
    fn dataset_collects_column_names() {
        let profile = IntensityProfile::new(vec![0.0], vec![1.0]).unwrap();
        let rec = |slit: i64| ProfileRecord {
            profile: profile.clone(),
            metadata: BTreeMap::from([("slit_um".to_string(), MetadataValue::Integer(slit))]),
        };
        let ds = ProfileDataset::from_records(vec![rec(50), rec(80), rec(50)]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.column_names, vec!["slit_um".to_string()]);
        assert_eq!(ds.records[1].label(Some("slit_um"), 1), "80");
        assert_eq!(ds.records[1].label(None, 1), "profile 1");
    }
}
