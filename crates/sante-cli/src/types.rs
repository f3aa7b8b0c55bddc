use std::fmt;
use std::path::PathBuf;

use sante_normalize::TableSkip;
use sante_output::QualityReport;
use sante_store::SyncReport;

/// Why a source contributed no rows.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// No reader could parse the file for its container kind.
    Unreadable { message: String },
    /// Tables were found but none carried the minimum columns.
    Unnormalizable { tables: Vec<TableSkip> },
    /// Normalization succeeded but every row was dropped.
    NoRows,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable { message } => write!(f, "unreadable: {message}"),
            Self::Unnormalizable { tables } => {
                f.write_str("unnormalizable")?;
                for (idx, table) in tables.iter().enumerate() {
                    let missing: Vec<&str> =
                        table.missing.iter().map(|m| m.canonical_name()).collect();
                    let sep = if idx == 0 { ": " } else { "; " };
                    write!(f, "{sep}{} lacks {}", table.label, missing.join(", "))?;
                }
                Ok(())
            }
            Self::NoRows => f.write_str("no valid rows"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    Normalized { tables: usize, rows: usize },
    Skipped { reason: SkipReason },
}

impl SourceOutcome {
    pub fn is_normalized(&self) -> bool {
        matches!(self, Self::Normalized { .. })
    }
}

#[derive(Debug, Clone)]
pub struct SourceSummary {
    pub name: String,
    pub disease: String,
    pub path: PathBuf,
    pub outcome: SourceOutcome,
}

/// Row counts of one disease through the pipeline stages.
#[derive(Debug, Clone)]
pub struct DiseaseSummary {
    pub disease: String,
    pub sources: usize,
    pub normalized_rows: usize,
    /// Per-disease canonical CSV of the normalized rows.
    pub normalized_csv: PathBuf,
    pub cleaned_rows: usize,
    pub removed_rows: usize,
    pub aggregated_rows: usize,
}

#[derive(Debug, Clone)]
pub enum StorageOutcome {
    Written(SyncReport),
    /// The transaction was rolled back; stored rows are unchanged.
    Failed { message: String },
}

#[derive(Debug, Clone)]
pub struct StorageSummary {
    pub disease: String,
    pub outcome: StorageOutcome,
}

#[derive(Debug)]
pub struct RunResult {
    pub sources: Vec<SourceSummary>,
    pub diseases: Vec<DiseaseSummary>,
    pub storage: Vec<StorageSummary>,
    /// Merged canonical CSV, when any source produced rows.
    pub output_file: Option<PathBuf>,
    pub report_file: Option<PathBuf>,
    pub report: Option<QualityReport>,
    pub total_rows: usize,
}

impl RunResult {
    pub fn storage_errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.storage.iter().filter_map(|s| match &s.outcome {
            StorageOutcome::Failed { message } => Some((s.disease.as_str(), message.as_str())),
            StorageOutcome::Written(_) => None,
        })
    }

    /// Only storage failures make a run unsuccessful; skipped sources do not.
    pub fn has_errors(&self) -> bool {
        self.storage_errors().next().is_some()
    }

    pub fn stored_for(&self, disease: &str) -> Option<&StorageOutcome> {
        self.storage
            .iter()
            .find(|s| s.disease == disease)
            .map(|s| &s.outcome)
    }
}
