//! Output files of the health-statistics pipeline.
//!
//! - [`write_canonical_csv`] / [`read_canonical_csv`]: the canonical CSV
//!   interchange format (UTF-8 with BOM, canonical header names)
//! - [`QualityReport`]: summary statistics over the merged table

mod canonical_csv;
mod error;
mod io;
mod report;

pub use canonical_csv::{read_canonical_csv, render_canonical_csv, write_canonical_csv};
pub use error::{OutputError, Result};
pub use io::write_atomic;
pub use report::{CountEntry, QualityReport, ValueStats, YearRange, write_quality_report};
