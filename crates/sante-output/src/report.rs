//! Data quality report over the merged table.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use chrono::{DateTime, Utc};
use polars::prelude::DataFrame;
use sante_common::round_half_away;
use sante_model::read_canonical_rows;
use serde::Serialize;

use crate::error::Result;
use crate::io::write_atomic;

/// Number of region names listed as examples.
const REGION_EXAMPLES: usize = 5;

/// A labelled count with its share of the total rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountEntry {
    pub name: String,
    pub count: usize,
    /// Percentage of all rows, one decimal.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub min: i64,
    pub max: i64,
    pub distinct: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

/// Summary statistics describing the merged canonical table.
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub generated_at: DateTime<Utc>,
    pub total_rows: usize,
    pub columns: Vec<String>,
    /// Rows per disease, most frequent first.
    pub diseases: Vec<CountEntry>,
    pub years: Option<YearRange>,
    pub region_count: usize,
    /// First distinct region names in row order.
    pub region_examples: Vec<String>,
    /// Rows per indicator, most frequent first.
    pub indicators: Vec<CountEntry>,
    /// Null cells per column, only columns that have some.
    pub missing: Vec<CountEntry>,
    pub values: Option<ValueStats>,
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_half_away(count as f64 * 100.0 / total as f64, 1)
    }
}

/// Counts occurrences, ordered by descending count then name.
fn frequency<'a>(values: impl Iterator<Item = &'a str>, total: usize) -> Vec<CountEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    let mut entries: Vec<CountEntry> = counts
        .into_iter()
        .map(|(name, count)| CountEntry {
            name: name.to_string(),
            count,
            percent: percent(count, total),
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    entries
}

fn value_stats(mut values: Vec<f64>) -> Option<ValueStats> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    };
    Some(ValueStats {
        min: values[0],
        max: values[n - 1],
        mean: round_half_away(mean, 2),
        median: round_half_away(median, 2),
    })
}

impl QualityReport {
    /// Computes the report for a canonical frame.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let total = df.height();
        let rows = read_canonical_rows(df)?;

        let diseases = frequency(rows.iter().filter_map(|r| r.disease.as_deref()), total);
        let indicators = frequency(rows.iter().filter_map(|r| r.indicator.as_deref()), total);

        let years: BTreeSet<i64> = rows.iter().filter_map(|r| r.year).collect();
        let years = match (years.first(), years.last()) {
            (Some(min), Some(max)) => Some(YearRange {
                min: *min,
                max: *max,
                distinct: years.len(),
            }),
            _ => None,
        };

        let mut seen_regions = BTreeSet::new();
        let mut region_examples = Vec::new();
        for region in rows.iter().filter_map(|r| r.region.as_deref()) {
            if seen_regions.insert(region) && region_examples.len() < REGION_EXAMPLES {
                region_examples.push(region.to_string());
            }
        }

        let missing = df
            .get_columns()
            .iter()
            .filter(|column| column.null_count() > 0)
            .map(|column| CountEntry {
                name: column.name().to_string(),
                count: column.null_count(),
                percent: percent(column.null_count(), total),
            })
            .collect();

        Ok(Self {
            generated_at: Utc::now(),
            total_rows: total,
            columns: df
                .get_column_names()
                .into_iter()
                .map(|name| name.to_string())
                .collect(),
            diseases,
            years,
            region_count: seen_regions.len(),
            region_examples,
            indicators,
            missing,
            values: value_stats(rows.iter().filter_map(|r| r.value).collect()),
        })
    }
}

/// Writes the report as pretty-printed JSON.
pub fn write_quality_report(report: &QualityReport, path: &Path) -> Result<()> {
    let json = serde_json::to_vec_pretty(report)?;
    write_atomic(path, &json)?;
    tracing::info!(path = %path.display(), "wrote quality report");
    Ok(())
}
