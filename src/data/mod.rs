/// Data layer: profile types, loading, and selection.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ProfileDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ ProfileDataset │  Vec<ProfileRecord>, column index
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  metadata predicates → selected indices
///   └──────────┘
///        │
///        ▼
///   IntensityProfile  →  analysis
/// ```
pub mod filter;
pub mod loader;
pub mod model;
