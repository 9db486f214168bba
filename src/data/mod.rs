/// Data layer: core types, loading, and sample generation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet          (no file)
///        │                              │
///        ▼                              ▼
///   ┌──────────┐                  ┌──────────┐
///   │  loader   │                  │  sample   │
///   └──────────┘                  └──────────┘
///        │  parse + infer types         │  deterministic sales data
///        └──────────────┬──────────────┘
///                       ▼
///                  ┌─────────┐
///                  │  Table   │  named, typed columns
///                  └─────────┘
/// ```

pub mod loader;
pub mod model;
pub mod sample;
