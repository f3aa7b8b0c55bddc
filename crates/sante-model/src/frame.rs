//! Building and reading canonical Polars frames.
//!
//! Frames only ever hold canonical columns. Reads go row by row through
//! `AnyValue` so that a `String` year column left over from a CSV source reads
//! the same as a proper `Int64` one.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};
use sante_common::{any_to_f64, any_to_integral, any_to_string, any_to_text};

use crate::column::CanonicalColumn;
use crate::observation::{CanonicalRow, Observation};

/// Builds a frame holding `columns` (in the given order) from `rows`.
pub fn build_canonical_frame(
    columns: &[CanonicalColumn],
    rows: &[CanonicalRow],
) -> PolarsResult<DataFrame> {
    let built: Vec<Column> = columns
        .iter()
        .map(|column| build_column(*column, rows))
        .collect();
    DataFrame::new(built)
}

fn build_column(column: CanonicalColumn, rows: &[CanonicalRow]) -> Column {
    let name = column.name().into();
    match column {
        CanonicalColumn::Year => {
            let values: Vec<Option<i64>> = rows.iter().map(|r| r.year).collect();
            Series::new(name, values).into_column()
        }
        CanonicalColumn::Value => {
            let values: Vec<Option<f64>> = rows.iter().map(|r| r.value).collect();
            Series::new(name, values).into_column()
        }
        CanonicalColumn::Disease
        | CanonicalColumn::Region
        | CanonicalColumn::Indicator
        | CanonicalColumn::Unit => {
            let values: Vec<Option<String>> = rows
                .iter()
                .map(|r| text_field(r, column).map(str::to_string))
                .collect();
            Series::new(name, values).into_column()
        }
    }
}

fn text_field(row: &CanonicalRow, column: CanonicalColumn) -> Option<&str> {
    match column {
        CanonicalColumn::Disease => row.disease.as_deref(),
        CanonicalColumn::Region => row.region.as_deref(),
        CanonicalColumn::Indicator => row.indicator.as_deref(),
        CanonicalColumn::Unit => row.unit.as_deref(),
        CanonicalColumn::Year | CanonicalColumn::Value => None,
    }
}

/// Canonical columns present in `df`, in canonical order.
pub fn canonical_columns_of(df: &DataFrame) -> Vec<CanonicalColumn> {
    CanonicalColumn::ALL
        .into_iter()
        .filter(|column| df.column(column.name()).is_ok())
        .collect()
}

/// Reads every row of `df` into [`CanonicalRow`]s.
///
/// Absent columns read as null. Text cells are trimmed and blank text counts
/// as null, except for the unit where an empty string is a legitimate value.
pub fn read_canonical_rows(df: &DataFrame) -> PolarsResult<Vec<CanonicalRow>> {
    let lookup = |column: CanonicalColumn| df.column(column.name()).ok();
    let disease = lookup(CanonicalColumn::Disease);
    let year = lookup(CanonicalColumn::Year);
    let region = lookup(CanonicalColumn::Region);
    let indicator = lookup(CanonicalColumn::Indicator);
    let value = lookup(CanonicalColumn::Value);
    let unit = lookup(CanonicalColumn::Unit);

    let mut rows = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut row = CanonicalRow::default();
        if let Some(col) = disease {
            row.disease = any_to_text(col.get(idx)?);
        }
        if let Some(col) = year {
            row.year = any_to_integral(col.get(idx)?);
        }
        if let Some(col) = region {
            row.region = any_to_text(col.get(idx)?);
        }
        if let Some(col) = indicator {
            row.indicator = any_to_text(col.get(idx)?);
        }
        if let Some(col) = value {
            row.value = any_to_f64(col.get(idx)?);
        }
        if let Some(col) = unit {
            let cell = col.get(idx)?;
            if !cell.is_null() {
                row.unit = Some(any_to_string(cell).trim().to_string());
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Concatenates canonical frames row-wise.
///
/// The output carries the union of the inputs' canonical columns. A frame that
/// lacks one of them contributes nulls. With no input, the result has every
/// canonical column and no rows.
pub fn concat_canonical(frames: &[DataFrame]) -> PolarsResult<DataFrame> {
    if frames.is_empty() {
        return build_canonical_frame(&CanonicalColumn::ALL, &[]);
    }
    let columns: Vec<CanonicalColumn> = CanonicalColumn::ALL
        .into_iter()
        .filter(|column| frames.iter().any(|df| df.column(column.name()).is_ok()))
        .collect();
    let mut rows = Vec::new();
    for df in frames {
        rows.extend(read_canonical_rows(df)?);
    }
    build_canonical_frame(&columns, &rows)
}

/// Builds a six-column canonical frame from complete observations.
pub fn observations_to_frame(observations: &[Observation]) -> PolarsResult<DataFrame> {
    let rows: Vec<CanonicalRow> = observations.iter().map(Observation::to_row).collect();
    build_canonical_frame(&CanonicalColumn::ALL, &rows)
}

/// Reads complete observations out of a canonical frame.
///
/// Rows missing an essential cell are skipped. Returns the observations and
/// the number of skipped rows.
pub fn frame_to_observations(df: &DataFrame) -> PolarsResult<(Vec<Observation>, usize)> {
    let rows = read_canonical_rows(df)?;
    let total = rows.len();
    let observations: Vec<Observation> = rows.iter().filter_map(Observation::from_row).collect();
    let skipped = total - observations.len();
    Ok((observations, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::DataType;

    fn sample_rows() -> Vec<CanonicalRow> {
        vec![
            CanonicalRow {
                disease: Some("diabete".into()),
                year: Some(2020),
                region: Some("Bretagne".into()),
                indicator: Some("prevalence".into()),
                value: Some(7.5),
                unit: Some("%".into()),
            },
            CanonicalRow {
                disease: Some("diabete".into()),
                year: None,
                region: Some("Normandie".into()),
                indicator: None,
                value: Some(6.0),
                unit: None,
            },
        ]
    }

    #[test]
    fn test_build_frame_dtypes() {
        let df = build_canonical_frame(&CanonicalColumn::ALL, &sample_rows()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 6);
        assert_eq!(df.column("annee").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("valeur").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("region").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_read_rows_round_trip() {
        let rows = sample_rows();
        let df = build_canonical_frame(&CanonicalColumn::ALL, &rows).unwrap();
        assert_eq!(read_canonical_rows(&df).unwrap(), rows);
    }

    #[test]
    fn test_read_rows_coerces_text_year() {
        let df = DataFrame::new(vec![
            Series::new("annee".into(), vec!["2019", "abc"]).into_column(),
            Series::new("valeur".into(), vec!["1,5", "2"]).into_column(),
        ])
        .unwrap();
        let rows = read_canonical_rows(&df).unwrap();
        assert_eq!(rows[0].year, Some(2019));
        assert_eq!(rows[0].value, Some(1.5));
        assert_eq!(rows[1].year, None);
        assert_eq!(rows[1].disease, None);
    }

    #[test]
    fn test_concat_union_of_columns() {
        let a = build_canonical_frame(
            &[CanonicalColumn::Disease, CanonicalColumn::Value],
            &sample_rows()[..1],
        )
        .unwrap();
        let b = build_canonical_frame(
            &[
                CanonicalColumn::Disease,
                CanonicalColumn::Value,
                CanonicalColumn::Unit,
            ],
            &sample_rows()[..1],
        )
        .unwrap();
        let merged = concat_canonical(&[a, b]).unwrap();
        assert_eq!(merged.height(), 2);
        assert_eq!(
            canonical_columns_of(&merged),
            vec![
                CanonicalColumn::Disease,
                CanonicalColumn::Value,
                CanonicalColumn::Unit
            ]
        );
        let rows = read_canonical_rows(&merged).unwrap();
        assert_eq!(rows[0].unit, None);
        assert_eq!(rows[1].unit.as_deref(), Some("%"));
    }

    #[test]
    fn test_concat_empty() {
        let df = concat_canonical(&[]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 6);
    }

    #[test]
    fn test_frame_to_observations_skips_incomplete() {
        let df = build_canonical_frame(&CanonicalColumn::ALL, &sample_rows()).unwrap();
        let (observations, skipped) = frame_to_observations(&df).unwrap();
        assert_eq!(observations.len(), 1);
        assert_eq!(skipped, 1);
        let back = observations_to_frame(&observations).unwrap();
        assert_eq!(back.height(), 1);
    }
}
