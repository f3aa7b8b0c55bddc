//! Normalization of every table extracted from one source.

use polars::prelude::DataFrame;
use sante_ingest::RawTable;
use sante_model::concat_canonical;

use crate::error::Result;
use crate::normalizer::{NormalizeOutcome, normalize_table};
use crate::synonyms::SourceField;

/// A table of the source that could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSkip {
    pub label: String,
    pub missing: Vec<SourceField>,
}

/// Outcome of normalizing a whole source.
#[derive(Debug, Clone)]
pub struct SourceNormalization {
    /// Concatenated canonical rows, `None` when no table normalized.
    pub frame: Option<DataFrame>,
    pub tables: usize,
    pub skipped: Vec<TableSkip>,
}

impl SourceNormalization {
    pub fn normalized_tables(&self) -> usize {
        self.tables - self.skipped.len()
    }
}

/// Runs the normalizer on every table of a source and keeps the successes.
pub fn normalize_source(tables: &[RawTable], disease: &str) -> Result<SourceNormalization> {
    let mut frames = Vec::new();
    let mut skipped = Vec::new();
    for table in tables {
        match normalize_table(&table.data, disease)? {
            NormalizeOutcome::Normalized(frame) => {
                tracing::debug!(table = %table.label, rows = frame.height(), "normalized table");
                frames.push(frame);
            }
            NormalizeOutcome::Unnormalizable { missing } => {
                let names: Vec<&str> = missing.iter().map(|f| f.canonical_name()).collect();
                tracing::info!(
                    table = %table.label,
                    missing = %names.join(", "),
                    "table lacks required columns, skipping"
                );
                skipped.push(TableSkip {
                    label: table.label.clone(),
                    missing,
                });
            }
        }
    }

    let frame = if frames.is_empty() {
        None
    } else {
        Some(concat_canonical(&frames)?)
    };
    Ok(SourceNormalization {
        frame,
        tables: tables.len(),
        skipped,
    })
}
