//! Health-statistics pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: read every configured source and normalize its tables
//! 2. **Clean**: per disease, write the normalized rows, then clean them
//! 3. **Aggregate**: one row per observation key and disease
//! 4. **Merge**: concatenate diseases, write the merged CSV and quality report
//! 5. **Store**: synchronise each disease into storage in its own transaction
//!
//! A source that cannot be read or normalized is skipped and reported; only
//! storage failures make a run unsuccessful.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{error, info, info_span, warn};

use sante_ingest::read_source_file;
use sante_model::concat_canonical;
use sante_normalize::{RegionCanonicalizer, normalize_source};
use sante_output::{QualityReport, write_canonical_csv, write_quality_report};
use sante_store::{ObservationStore, SyncOptions, sync_disease};
use sante_transform::{aggregate, clean_frame, merge_frames, partition_by_disease};

use crate::config::{Config, SourceConfig};
use crate::types::{
    DiseaseSummary, RunResult, SkipReason, SourceOutcome, SourceSummary, StorageOutcome,
    StorageSummary,
};

/// A source after ingestion: its summary and, when normalized, its rows.
#[derive(Debug)]
pub struct IngestedSource {
    pub summary: SourceSummary,
    pub frame: Option<DataFrame>,
}

/// Reads and normalizes one source. Never fails: problems become a
/// [`SourceOutcome::Skipped`].
pub fn ingest_source(source: &SourceConfig, data_dir: &Path) -> IngestedSource {
    let path = source.path(data_dir);
    let span = info_span!("source", name = %source.name, disease = %source.disease);
    let _guard = span.enter();

    let (outcome, frame) = match load_source(source, &path) {
        Ok((tables, frame)) => {
            info!(tables, rows = frame.height(), "normalized source");
            let outcome = SourceOutcome::Normalized {
                tables,
                rows: frame.height(),
            };
            (outcome, Some(frame))
        }
        Err(reason) => {
            warn!(path = %path.display(), %reason, "skipping source");
            (SourceOutcome::Skipped { reason }, None)
        }
    };
    IngestedSource {
        summary: SourceSummary {
            name: source.name.clone(),
            disease: source.disease.clone(),
            path,
            outcome,
        },
        frame,
    }
}

fn load_source(
    source: &SourceConfig,
    path: &Path,
) -> std::result::Result<(usize, DataFrame), SkipReason> {
    let tables = read_source_file(path, source.kind).map_err(|e| SkipReason::Unreadable {
        message: e.to_string(),
    })?;
    let normalization =
        normalize_source(&tables, &source.disease).map_err(|e| SkipReason::Unreadable {
            message: e.to_string(),
        })?;
    let tables = normalization.normalized_tables();
    let Some(frame) = normalization.frame else {
        return Err(SkipReason::Unnormalizable {
            tables: normalization.skipped,
        });
    };
    if frame.height() == 0 {
        return Err(SkipReason::NoRows);
    }
    Ok((tables, frame))
}

/// File name of the per-disease normalized CSV.
pub fn disease_file_name(disease: &str) -> String {
    let safe: String = disease
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    format!("{safe}.csv")
}

/// Writes, cleans and aggregates the normalized rows of one disease.
pub fn process_disease(
    disease: &str,
    frames: &[DataFrame],
    canonicalizer: &RegionCanonicalizer,
    output_dir: &Path,
) -> Result<(DiseaseSummary, DataFrame)> {
    let span = info_span!("disease", disease = %disease);
    let _guard = span.enter();

    let normalized = concat_canonical(frames).context("concatenate normalized tables")?;
    let normalized_csv = output_dir.join(disease_file_name(disease));
    write_canonical_csv(&normalized, &normalized_csv)
        .with_context(|| format!("write {}", normalized_csv.display()))?;

    let cleaned = info_span!("clean")
        .in_scope(|| clean_frame(&normalized, canonicalizer))
        .with_context(|| format!("clean {disease}"))?;
    let aggregated = info_span!("aggregate")
        .in_scope(|| aggregate(&cleaned.frame))
        .with_context(|| format!("aggregate {disease}"))?;
    info!(
        normalized = normalized.height(),
        cleaned = cleaned.frame.height(),
        aggregated = aggregated.height(),
        "prepared disease"
    );

    let summary = DiseaseSummary {
        disease: disease.to_string(),
        sources: frames.len(),
        normalized_rows: normalized.height(),
        normalized_csv,
        cleaned_rows: cleaned.frame.height(),
        removed_rows: cleaned.removed_rows(),
        aggregated_rows: aggregated.height(),
    };
    Ok((summary, aggregated))
}

/// Synchronises every disease of `merged` into `store`.
///
/// A failed transaction is recorded and the next disease is attempted.
pub fn synchronise(
    store: &mut dyn ObservationStore,
    merged: &DataFrame,
    options: &SyncOptions,
) -> Result<Vec<StorageSummary>> {
    let span = info_span!("store", mode = %options.mode);
    let _guard = span.enter();

    let partitions = partition_by_disease(merged).context("partition merged table")?;
    let mut summaries = Vec::with_capacity(partitions.len());
    for (disease, frame) in partitions {
        let outcome = match sync_disease(&mut *store, &disease, &frame, options) {
            Ok(report) => StorageOutcome::Written(report),
            Err(e) => {
                error!(disease = %disease, error = %e, "storage transaction failed, rows left unchanged");
                StorageOutcome::Failed {
                    message: e.to_string(),
                }
            }
        };
        summaries.push(StorageSummary { disease, outcome });
    }
    Ok(summaries)
}

/// Runs every stage over the configured sources.
///
/// `store` is `None` when storage is disabled.
pub fn run_pipeline(config: &Config, store: Option<&mut dyn ObservationStore>) -> Result<RunResult> {
    let span = info_span!("run", sources = config.sources.len());
    let _guard = span.enter();

    let mut sources = Vec::with_capacity(config.sources.len());
    let mut by_disease: BTreeMap<String, Vec<DataFrame>> = BTreeMap::new();
    for source in &config.sources {
        let ingested = ingest_source(source, &config.paths.data_dir);
        if let Some(frame) = ingested.frame {
            by_disease
                .entry(source.disease.clone())
                .or_default()
                .push(frame);
        }
        sources.push(ingested.summary);
    }

    if by_disease.is_empty() {
        warn!("no source produced rows, nothing written");
        return Ok(RunResult {
            sources,
            diseases: Vec::new(),
            storage: Vec::new(),
            output_file: None,
            report_file: None,
            report: None,
            total_rows: 0,
        });
    }

    let canonicalizer = RegionCanonicalizer::new(config.region_corrections());
    let output_dir = config.paths.output_dir();
    let mut diseases = Vec::with_capacity(by_disease.len());
    let mut aggregated = Vec::with_capacity(by_disease.len());
    for (disease, frames) in &by_disease {
        let (summary, frame) = process_disease(disease, frames, &canonicalizer, &output_dir)?;
        diseases.push(summary);
        aggregated.push(frame);
    }

    let merged = merge_frames(&aggregated).context("merge disease tables")?;
    let output_file = config.paths.output_file.clone();
    write_canonical_csv(&merged, &output_file)
        .with_context(|| format!("write {}", output_file.display()))?;
    let report = QualityReport::from_frame(&merged).context("compute quality report")?;
    let report_file = config.paths.report_file();
    write_quality_report(&report, &report_file)
        .with_context(|| format!("write {}", report_file.display()))?;
    info!(rows = merged.height(), diseases = diseases.len(), "merged output written");

    let storage = match store {
        Some(store) => {
            let options = SyncOptions {
                mode: config.database.mode,
                backup_dir: config.paths.backup_dir.clone(),
            };
            synchronise(store, &merged, &options)?
        }
        None => Vec::new(),
    };

    Ok(RunResult {
        sources,
        diseases,
        storage,
        output_file: Some(output_file),
        report_file: Some(report_file),
        report: Some(report),
        total_rows: merged.height(),
    })
}

/// Output paths of a run, for display.
pub fn written_files(result: &RunResult) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = result
        .diseases
        .iter()
        .map(|d| d.normalized_csv.clone())
        .collect();
    files.extend(result.output_file.clone());
    files.extend(result.report_file.clone());
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disease_file_name() {
        assert_eq!(disease_file_name("diabete"), "diabete.csv");
        assert_eq!(disease_file_name("vih/sida"), "vih_sida.csv");
    }

    #[test]
    fn test_missing_source_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let source = SourceConfig::new("absent", "absent.csv", "diabete");
        let ingested = ingest_source(&source, dir.path());
        assert!(ingested.frame.is_none());
        assert!(matches!(
            ingested.summary.outcome,
            SourceOutcome::Skipped {
                reason: SkipReason::Unreadable { .. }
            }
        ));
    }

    #[test]
    fn test_source_without_required_columns_is_unnormalizable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pop.csv"), "commune,habitants\nRennes,220000\n").unwrap();
        let source = SourceConfig::new("insee_pop", "pop.csv", "insee");
        let ingested = ingest_source(&source, dir.path());
        match ingested.summary.outcome {
            SourceOutcome::Skipped {
                reason: SkipReason::Unnormalizable { tables },
            } => {
                assert_eq!(tables.len(), 1);
                assert!(!tables[0].missing.is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
