//! Transformation stages for canonical health tables.
//!
//! Each stage takes a frame by reference and returns a new one:
//!
//! 1. [`clean_frame`]: header repair, region canonicalization, type coercion,
//!    removal of empty, incomplete and duplicate rows
//! 2. [`aggregate`]: one row per observation key, mean value rounded to two
//!    decimals
//! 3. [`merge_frames`]: concatenation of per-disease tables in a stable
//!    (year, disease, region) order
//!
//! [`partition_by_disease`] splits a merged table back into per-disease
//! tables for storage.

mod aggregate;
mod clean;
mod error;
mod merge;
mod partition;

pub use aggregate::aggregate;
pub use clean::{CleanOutcome, clean_frame, normalize_header};
pub use error::{Result, TransformError};
pub use merge::merge_frames;
pub use partition::partition_by_disease;
