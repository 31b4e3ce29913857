/// Data layer: core types and loading.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, infer column types → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  ordered, typed columns (numeric / text / temporal)
///   └──────────┘
///        │
///        ▼
///     insights
/// ```

pub mod loader;
pub mod model;
