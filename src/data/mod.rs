/// Data layer: wide/tall record types, parsing, transposition and writing.
///
/// Architecture:
/// ```text
///   wide .tsv (filters | QE)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → WideFilterRecord / WideQeRecord
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ transpose  │  one row per wavelength → TallTable
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  serialize TSV, stage, rename over the source
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod transpose;
pub mod writer;
