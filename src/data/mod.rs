/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  jobs_in_data.csv (.json / .parquet)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file once → Arc<Relation>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year ∧ experience ∈ set ∧ setting ∈ set
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  means, totals, box statistics
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
