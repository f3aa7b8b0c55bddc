//! Per-disease synchronisation of canonical tables into storage.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use sante_model::{Observation, frame_to_observations, observations_to_frame};
use sante_output::write_canonical_csv;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::ObservationStore;

/// How incoming rows meet the rows already stored for a disease.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Delete the disease's rows, then upsert the incoming ones.
    #[default]
    Replace,
    /// Insert, overwriting value and unit of rows with the same key.
    Upsert,
}

impl std::fmt::Display for WriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Replace => "replace",
            Self::Upsert => "upsert",
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub mode: WriteMode,
    /// Directory receiving `backup_observations_<disease>.csv` before a
    /// replace. No backup is written when unset.
    pub backup_dir: Option<PathBuf>,
}

/// What [`sync_disease`] did for one disease.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub disease: String,
    pub mode: WriteMode,
    pub written: usize,
    /// Rows lacking a disease, year, region or value.
    pub skipped_incomplete: usize,
    /// Rows belonging to another disease.
    pub skipped_foreign: usize,
    /// Backup file written before the delete, if any.
    pub backup: Option<PathBuf>,
}

/// File name of the backup taken before replacing `disease`.
///
/// # Examples
///
/// ```
/// use sante_store::backup_file_name;
///
/// assert_eq!(backup_file_name("diabete"), "backup_observations_diabete.csv");
/// assert_eq!(backup_file_name("a/b"), "backup_observations_a_b.csv");
/// ```
pub fn backup_file_name(disease: &str) -> String {
    let safe: String = disease
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    format!("backup_observations_{safe}.csv")
}

fn write_backup(dir: &Path, disease: &str, rows: &[Observation]) -> Option<PathBuf> {
    let path = dir.join(backup_file_name(disease));
    let written = observations_to_frame(rows)
        .map_err(sante_output::OutputError::from)
        .and_then(|frame| write_canonical_csv(&frame, &path));
    match written {
        Ok(count) => {
            tracing::info!(disease, rows = count, path = %path.display(), "backed up stored rows");
            Some(path)
        }
        Err(e) => {
            tracing::warn!(disease, error = %e, "backup failed, continuing with the write");
            None
        }
    }
}

/// Writes the canonical table of one disease to storage.
///
/// In replace mode the rows currently stored for the disease are exported to
/// the backup directory first; a failed backup is logged and the write goes
/// ahead. The write itself is a single transaction: on error the stored rows
/// of the disease are unchanged and the error is returned.
pub fn sync_disease<S: ObservationStore + ?Sized>(
    store: &mut S,
    disease: &str,
    frame: &DataFrame,
    options: &SyncOptions,
) -> Result<SyncReport> {
    let (observations, skipped_incomplete) = frame_to_observations(frame)?;
    let total = observations.len();
    let rows: Vec<Observation> = observations
        .into_iter()
        .filter(|obs| obs.disease == disease)
        .collect();
    let skipped_foreign = total - rows.len();
    if skipped_foreign > 0 {
        tracing::warn!(disease, skipped_foreign, "ignoring rows of other diseases");
    }

    let mut backup = None;
    let written = match options.mode {
        WriteMode::Replace => {
            if let Some(dir) = &options.backup_dir {
                let existing = store.rows_for_disease(disease)?;
                if !existing.is_empty() {
                    backup = write_backup(dir, disease, &existing);
                }
            }
            store.replace_disease(disease, &rows)?
        }
        WriteMode::Upsert => store.upsert(&rows)?,
    };

    tracing::info!(disease, mode = %options.mode, written, "synchronised disease");
    Ok(SyncReport {
        disease: disease.to_string(),
        mode: options.mode,
        written,
        skipped_incomplete,
        skipped_foreign,
        backup,
    })
}
