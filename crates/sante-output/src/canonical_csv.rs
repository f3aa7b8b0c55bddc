//! The canonical CSV interchange format.
//!
//! Header names are the canonical column names in canonical order, years are
//! written as integers, values without trailing zeros and nulls as empty
//! cells. Files start with a UTF-8 BOM so spreadsheet software picks the
//! right encoding for accented region names.

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Writer};
use polars::prelude::DataFrame;
use sante_common::{format_numeric, parse_f64, parse_integral};
use sante_model::{
    CanonicalColumn, CanonicalRow, build_canonical_frame, canonical_columns_of,
    read_canonical_rows, with_default_units,
};

use crate::error::{OutputError, Result};
use crate::io::write_atomic;

const BOM: &str = "\u{feff}";

fn cell(row: &CanonicalRow, column: CanonicalColumn) -> String {
    match column {
        CanonicalColumn::Disease => row.disease.clone().unwrap_or_default(),
        CanonicalColumn::Year => row.year.map(|y| y.to_string()).unwrap_or_default(),
        CanonicalColumn::Region => row.region.clone().unwrap_or_default(),
        CanonicalColumn::Indicator => row.indicator.clone().unwrap_or_default(),
        CanonicalColumn::Value => row.value.map(format_numeric).unwrap_or_default(),
        CanonicalColumn::Unit => row.unit.clone().unwrap_or_default(),
    }
}

/// Renders the canonical columns of `df` as CSV text, without BOM.
pub fn render_canonical_csv(df: &DataFrame) -> Result<String> {
    let label = "<memory>";
    let columns = canonical_columns_of(df);
    let rows = read_canonical_rows(df)?;
    let csv_err = |source| OutputError::Csv {
        label: label.to_string(),
        source,
    };

    let mut writer = Writer::from_writer(Vec::new());
    writer
        .write_record(columns.iter().map(|c| c.name()))
        .map_err(csv_err)?;
    for row in &rows {
        writer
            .write_record(columns.iter().map(|c| cell(row, *c)))
            .map_err(csv_err)?;
    }
    let bytes = writer.into_inner().map_err(|e| OutputError::Io {
        operation: "flush",
        path: PathBuf::from(label),
        source: e.into_error(),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes `df` as a canonical CSV file, atomically.
///
/// Returns the number of data rows written.
pub fn write_canonical_csv(df: &DataFrame, path: &Path) -> Result<usize> {
    let mut content = String::from(BOM);
    content.push_str(&render_canonical_csv(df)?);
    write_atomic(path, content.as_bytes())?;
    tracing::info!(path = %path.display(), rows = df.height(), "wrote canonical CSV");
    Ok(df.height())
}

/// Loads a canonical CSV file.
///
/// The header must carry `maladie`, `annee`, `region`, `indicateur` and
/// `valeur`; the error lists every one that is missing. Unknown columns are
/// ignored. When `unite` is absent it is derived from the indicator.
pub fn read_canonical_csv(path: &Path) -> Result<DataFrame> {
    let bytes = std::fs::read(path).map_err(|e| OutputError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;
    let bytes = bytes.strip_prefix(BOM.as_bytes()).unwrap_or(&bytes);
    let label = path.display().to_string();

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    let headers = reader.headers().map_err(|source| OutputError::Csv {
        label: label.clone(),
        source,
    })?;
    let positions: Vec<(CanonicalColumn, usize)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, name)| {
            CanonicalColumn::from_name(&name.trim().to_lowercase()).map(|column| (column, idx))
        })
        .collect();

    let missing: Vec<String> = CanonicalColumn::REQUIRED
        .into_iter()
        .filter(|column| !positions.iter().any(|(c, _)| c == column))
        .map(|column| column.name().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(OutputError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| OutputError::Csv {
            label: label.clone(),
            source,
        })?;
        let mut row = CanonicalRow::default();
        for (column, idx) in &positions {
            let raw = record.get(*idx).unwrap_or("").trim();
            let text = (!raw.is_empty()).then(|| raw.to_string());
            match column {
                CanonicalColumn::Disease => row.disease = text,
                CanonicalColumn::Year => row.year = parse_integral(raw),
                CanonicalColumn::Region => row.region = text,
                CanonicalColumn::Indicator => row.indicator = text,
                CanonicalColumn::Value => row.value = parse_f64(raw),
                CanonicalColumn::Unit => row.unit = Some(raw.to_string()),
            }
        }
        rows.push(row);
    }

    let mut columns: Vec<CanonicalColumn> = positions.iter().map(|(c, _)| *c).collect();
    columns.sort();
    columns.dedup();
    let frame = build_canonical_frame(&columns, &rows)?;
    tracing::debug!(path = %path.display(), rows = frame.height(), "loaded canonical CSV");
    Ok(with_default_units(frame)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sante_model::{Observation, observations_to_frame};
    use tempfile::TempDir;

    fn sample() -> DataFrame {
        observations_to_frame(&[
            Observation::new("diabete", 2020, "Bretagne", "prevalence", 7.5, "%"),
            Observation::new(
                "cancer",
                2019,
                "Provence-Alpes-Côte d'Azur",
                "incidence",
                120.0,
                "pour 100 000 hab",
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_render_snapshot() {
        let rendered = render_canonical_csv(&sample()).unwrap();
        insta::assert_snapshot!(rendered, @r"
        maladie,annee,region,indicateur,valeur,unite
        diabete,2020,Bretagne,prevalence,7.5,%
        cancer,2019,Provence-Alpes-Côte d'Azur,incidence,120,pour 100 000 hab
        ");
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/donnees_sante_clean.csv");
        assert_eq!(write_canonical_csv(&sample(), &path).unwrap(), 2);

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(BOM.as_bytes()));

        let loaded = read_canonical_csv(&path).unwrap();
        assert_eq!(
            read_canonical_rows(&loaded).unwrap(),
            read_canonical_rows(&sample()).unwrap()
        );
    }

    #[test]
    fn test_read_reports_missing_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.csv");
        std::fs::write(&path, "maladie,region,indicateur\nsida,Corse,deces\n").unwrap();
        match read_canonical_csv(&path).unwrap_err() {
            OutputError::MissingColumns { missing, .. } => {
                assert_eq!(missing, vec!["annee", "valeur"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_fills_default_units() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sans_unite.csv");
        std::fs::write(
            &path,
            "maladie,annee,region,indicateur,valeur,source\n\
             diabete,2020,Corse,prevalence,6.1,atih\n\
             cardio,2020,Corse,mortalite,210,insee\n",
        )
        .unwrap();
        let df = read_canonical_csv(&path).unwrap();
        assert_eq!(df.width(), 6);
        let rows = read_canonical_rows(&df).unwrap();
        assert_eq!(rows[0].unit.as_deref(), Some("%"));
        assert_eq!(rows[1].unit.as_deref(), Some("pour 100 000 hab"));
    }
}
