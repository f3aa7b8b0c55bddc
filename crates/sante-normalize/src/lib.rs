//! Schema normalization for public health tables.
//!
//! Every source publishes its statistics under different column names and in
//! one of two layouts: long (one row per observation) or wide (one column per
//! year). This crate finds the canonical fields behind the source's headers
//! and reshapes the table into canonical rows.
//!
//! # Overview
//!
//! - **Column discovery**: ordered synonym lists per canonical field
//! - **Layout detection**: a single step yielding [`Layout::Long`] or
//!   [`Layout::Wide`], or the list of fields that could not be found
//! - **Normalization**: [`normalize_table`] turns a raw table into a
//!   canonical frame
//! - **Region canonicalization**: [`RegionCanonicalizer`] maps spelling
//!   variants to official region names
//!
//! # Example
//!
//! ```ignore
//! use sante_normalize::{NormalizeOutcome, normalize_table};
//!
//! match normalize_table(&raw.data, "diabete")? {
//!     NormalizeOutcome::Normalized(frame) => frames.push(frame),
//!     NormalizeOutcome::Unnormalizable { missing } => {
//!         tracing::warn!(?missing, "skipping table");
//!     }
//! }
//! ```

mod canonicalizer;
mod error;
mod layout;
mod normalizer;
mod source;
mod synonyms;

pub use canonicalizer::RegionCanonicalizer;
pub use error::{NormalizeError, Result};
pub use layout::{Layout, MissingFields, detect_layout};
pub use normalizer::{NormalizeOutcome, normalize_table};
pub use source::{SourceNormalization, TableSkip, normalize_source};
pub use synonyms::{SourceField, find_column};
