//! Cleaning of canonical tables before aggregation.

use std::collections::HashSet;

use polars::prelude::{Column, DataFrame};
use sante_common::any_to_string;
use sante_model::{
    CanonicalColumn, CanonicalRow, build_canonical_frame, canonical_columns_of,
    read_canonical_rows,
};
use sante_normalize::RegionCanonicalizer;

use crate::error::Result;

/// Rows kept and removed by [`clean_frame`].
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    /// Cleaned frame, canonical columns only, in canonical order.
    pub frame: DataFrame,
    pub input_rows: usize,
    pub removed_empty: usize,
    pub removed_incomplete: usize,
    pub removed_duplicates: usize,
}

impl CleanOutcome {
    pub fn removed_rows(&self) -> usize {
        self.removed_empty + self.removed_incomplete + self.removed_duplicates
    }
}

/// Normalizes a header: lowercase, trimmed, spaces as underscores.
///
/// Accented spellings of the year and region headers, and the department
/// headers, collapse onto the canonical names.
///
/// # Examples
///
/// ```
/// use sante_transform::normalize_header;
///
/// assert_eq!(normalize_header(" Année "), "annee");
/// assert_eq!(normalize_header("Département"), "region");
/// assert_eq!(normalize_header("Code Postal"), "code_postal");
/// ```
pub fn normalize_header(raw: &str) -> String {
    let name = raw.trim().to_lowercase().replace(' ', "_");
    match name.as_str() {
        "année" => "annee".to_string(),
        "région" | "departement" | "département" => "region".to_string(),
        _ => name,
    }
}

/// Renames every column; when two collapse onto one name the first is kept.
fn rename_columns(df: &DataFrame) -> Result<DataFrame> {
    let mut seen = HashSet::new();
    let mut columns: Vec<Column> = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let name = normalize_header(column.name().as_str());
        if !seen.insert(name.clone()) {
            tracing::debug!(column = %column.name(), renamed = %name, "dropping colliding column");
            continue;
        }
        let mut renamed = column.clone();
        renamed.rename(name.as_str().into());
        columns.push(renamed);
    }
    Ok(DataFrame::new(columns)?)
}

fn canonical_cell(row: &CanonicalRow, column: CanonicalColumn) -> Option<String> {
    match column {
        CanonicalColumn::Disease => row.disease.clone(),
        CanonicalColumn::Year => row.year.map(|y| y.to_string()),
        CanonicalColumn::Region => row.region.clone(),
        CanonicalColumn::Indicator => row.indicator.clone(),
        CanonicalColumn::Value => row.value.map(|v| format!("{v:?}")),
        CanonicalColumn::Unit => row.unit.clone(),
    }
}

/// Cleans one table.
///
/// Steps, in order: header normalization, region canonicalization, type
/// coercion, removal of fully empty rows, of rows missing a disease, year,
/// region or value (among the columns present), and of exact duplicates
/// across every column still present. Extra columns take part in the
/// duplicate comparison and are then projected away.
pub fn clean_frame(df: &DataFrame, canonicalizer: &RegionCanonicalizer) -> Result<CleanOutcome> {
    let renamed = rename_columns(df)?;
    let frame = canonicalizer.apply(&renamed)?;
    let present = canonical_columns_of(&frame);
    let extras: Vec<&Column> = frame
        .get_columns()
        .iter()
        .filter(|column| CanonicalColumn::from_name(column.name().as_str()).is_none())
        .collect();
    let rows = read_canonical_rows(&frame)?;
    let input_rows = rows.len();

    let mut removed_empty = 0;
    let mut removed_incomplete = 0;
    let mut removed_duplicates = 0;
    let mut seen: HashSet<Vec<Option<String>>> = HashSet::with_capacity(rows.len());
    let mut kept = Vec::with_capacity(rows.len());

    for (idx, row) in rows.into_iter().enumerate() {
        let mut signature: Vec<Option<String>> = present
            .iter()
            .map(|column| canonical_cell(&row, *column))
            .collect();
        for column in &extras {
            let cell = column.get(idx)?;
            signature.push((!cell.is_null()).then(|| any_to_string(cell)));
        }

        if signature.iter().all(Option::is_none) {
            removed_empty += 1;
            continue;
        }
        if present
            .iter()
            .any(|column| column.is_essential() && row.is_null(*column))
        {
            removed_incomplete += 1;
            continue;
        }
        if !seen.insert(signature) {
            removed_duplicates += 1;
            continue;
        }
        kept.push(row);
    }

    let outcome = CleanOutcome {
        frame: build_canonical_frame(&present, &kept)?,
        input_rows,
        removed_empty,
        removed_incomplete,
        removed_duplicates,
    };
    tracing::info!(
        input = input_rows,
        removed = outcome.removed_rows(),
        empty = removed_empty,
        incomplete = removed_incomplete,
        duplicates = removed_duplicates,
        "cleaned table"
    );
    Ok(outcome)
}
