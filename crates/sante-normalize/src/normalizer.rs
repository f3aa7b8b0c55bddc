//! Conversion of a raw table into canonical rows.

use polars::prelude::{Column, DataFrame};
use sante_common::{any_to_f64, any_to_integral, any_to_string, any_to_text};
use sante_model::{
    CanonicalColumn, CanonicalRow, DEFAULT_INDICATOR, UNKNOWN_DISEASE, build_canonical_frame,
};

use crate::error::Result;
use crate::layout::{Layout, detect_layout};
use crate::synonyms::SourceField;

/// Result of normalizing one table.
#[derive(Debug, Clone)]
pub enum NormalizeOutcome {
    /// Canonical frame with all six columns.
    Normalized(DataFrame),
    /// The table lacks required fields; the caller skips it.
    Unnormalizable { missing: Vec<SourceField> },
}

fn unit_text(column: Option<&Column>, idx: usize) -> Result<String> {
    let Some(column) = column else {
        return Ok(String::new());
    };
    let cell = column.get(idx)?;
    Ok(if cell.is_null() {
        String::new()
    } else {
        any_to_string(cell).trim().to_string()
    })
}

fn indicator_text(column: Option<&Column>, idx: usize) -> Result<String> {
    let text = match column {
        Some(column) => any_to_text(column.get(idx)?),
        None => None,
    };
    Ok(text.unwrap_or_else(|| DEFAULT_INDICATOR.to_string()))
}

/// Normalizes a raw table into the canonical schema.
///
/// `disease_hint` names the disease when the table has no disease column.
/// Rows without a year, region or numeric value are dropped.
pub fn normalize_table(df: &DataFrame, disease_hint: &str) -> Result<NormalizeOutcome> {
    let columns: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    let hint = match disease_hint.trim() {
        "" => UNKNOWN_DISEASE,
        hint => hint,
    };

    let rows = match detect_layout(&columns) {
        Ok(Layout::Long {
            year,
            region,
            value,
            indicator,
            unit,
            disease,
        }) => {
            let year = df.column(&year)?;
            let region = df.column(&region)?;
            let value = df.column(&value)?;
            let indicator = indicator.map(|name| df.column(&name)).transpose()?;
            let unit = unit.map(|name| df.column(&name)).transpose()?;
            let disease = disease.map(|name| df.column(&name)).transpose()?;

            let mut rows = Vec::with_capacity(df.height());
            for idx in 0..df.height() {
                let row = CanonicalRow {
                    disease: Some(match disease {
                        Some(column) => any_to_text(column.get(idx)?)
                            .unwrap_or_else(|| hint.to_string()),
                        None => hint.to_string(),
                    }),
                    year: any_to_integral(year.get(idx)?),
                    region: any_to_text(region.get(idx)?),
                    indicator: Some(indicator_text(indicator, idx)?),
                    value: any_to_f64(value.get(idx)?),
                    unit: Some(unit_text(unit, idx)?),
                };
                rows.push(row);
            }
            rows
        }
        Ok(Layout::Wide {
            region,
            year_columns,
            indicator,
            unit,
        }) => {
            let region = df.column(&region)?;
            let indicator = indicator.map(|name| df.column(&name)).transpose()?;
            let unit = unit.map(|name| df.column(&name)).transpose()?;
            let table_unit = if df.height() > 0 {
                unit_text(unit, 0)?
            } else {
                String::new()
            };

            let mut rows = Vec::with_capacity(df.height() * year_columns.len());
            for (name, year) in &year_columns {
                let cells = df.column(name)?;
                for idx in 0..df.height() {
                    rows.push(CanonicalRow {
                        disease: Some(hint.to_string()),
                        year: Some(*year),
                        region: any_to_text(region.get(idx)?),
                        indicator: Some(indicator_text(indicator, idx)?),
                        value: any_to_f64(cells.get(idx)?),
                        unit: Some(table_unit.clone()),
                    });
                }
            }
            rows
        }
        Err(missing) => {
            return Ok(NormalizeOutcome::Unnormalizable { missing: missing.0 });
        }
    };

    let total = rows.len();
    let rows: Vec<CanonicalRow> = rows
        .into_iter()
        .filter(|row| row.year.is_some() && row.region.is_some() && row.value.is_some())
        .collect();
    if rows.len() < total {
        tracing::debug!(
            dropped = total - rows.len(),
            kept = rows.len(),
            "dropped rows without year, region or value"
        );
    }
    let frame = build_canonical_frame(&CanonicalColumn::ALL, &rows)?;
    Ok(NormalizeOutcome::Normalized(frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};
    use sante_model::read_canonical_rows;

    fn text_frame(columns: &[(&str, Vec<Option<&str>>)]) -> DataFrame {
        DataFrame::new(
            columns
                .iter()
                .map(|(name, values)| Series::new((*name).into(), values.clone()).into_column())
                .collect(),
        )
        .unwrap()
    }

    fn normalized(outcome: NormalizeOutcome) -> Vec<CanonicalRow> {
        match outcome {
            NormalizeOutcome::Normalized(frame) => read_canonical_rows(&frame).unwrap(),
            NormalizeOutcome::Unnormalizable { missing } => {
                panic!("unexpected failure, missing {missing:?}")
            }
        }
    }

    #[test]
    fn test_long_table_with_synonyms() {
        let df = text_frame(&[
            ("Année", vec![Some("2020"), Some("abc"), Some("2021")]),
            ("Région", vec![Some(" Bretagne "), Some("Corse"), Some("Corse")]),
            ("Valeur", vec![Some("7,5"), Some("1"), None]),
        ]);
        let rows = normalized(normalize_table(&df, "diabete").unwrap());
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.disease.as_deref(), Some("diabete"));
        assert_eq!(row.year, Some(2020));
        assert_eq!(row.region.as_deref(), Some("Bretagne"));
        assert_eq!(row.indicator.as_deref(), Some("valeur"));
        assert_eq!(row.value, Some(7.5));
        assert_eq!(row.unit.as_deref(), Some(""));
    }

    #[test]
    fn test_long_table_disease_column_wins() {
        let df = text_frame(&[
            ("maladie", vec![Some("cancer"), None]),
            ("annee", vec![Some("2019"), Some("2019")]),
            ("region", vec![Some("Corse"), Some("Bretagne")]),
            ("indicateur", vec![Some("incidence"), Some("incidence")]),
            ("valeur", vec![Some("10"), Some("12")]),
            ("unite", vec![Some("pour 100 000 hab"), None]),
        ]);
        let rows = normalized(normalize_table(&df, "inca").unwrap());
        assert_eq!(rows[0].disease.as_deref(), Some("cancer"));
        assert_eq!(rows[1].disease.as_deref(), Some("inca"));
        assert_eq!(rows[0].unit.as_deref(), Some("pour 100 000 hab"));
        assert_eq!(rows[1].unit.as_deref(), Some(""));
    }

    #[test]
    fn test_wide_table_reshape() {
        let df = text_frame(&[
            ("region", vec![Some("Bretagne"), Some("Corse")]),
            ("2019", vec![Some("1.5"), Some("n/a")]),
            ("2020", vec![Some("2"), Some("3")]),
            ("unite", vec![Some("%"), Some("pour mille")]),
        ]);
        let rows = normalized(normalize_table(&df, "diabete").unwrap());
        let summary: Vec<(i64, &str, f64, &str)> = rows
            .iter()
            .map(|r| {
                (
                    r.year.unwrap(),
                    r.region.as_deref().unwrap(),
                    r.value.unwrap(),
                    r.unit.as_deref().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                (2019, "Bretagne", 1.5, "%"),
                (2020, "Bretagne", 2.0, "%"),
                (2020, "Corse", 3.0, "%"),
            ]
        );
        assert!(rows.iter().all(|r| r.indicator.as_deref() == Some("valeur")));
    }

    #[test]
    fn test_unnormalizable_table() {
        let df = text_frame(&[("commentaire", vec![Some("x")])]);
        match normalize_table(&df, "sida").unwrap() {
            NormalizeOutcome::Unnormalizable { missing } => {
                assert_eq!(
                    missing,
                    vec![SourceField::Value, SourceField::Year, SourceField::Region]
                );
            }
            NormalizeOutcome::Normalized(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_blank_hint_falls_back_to_unknown() {
        let df = text_frame(&[
            ("year", vec![Some("2020")]),
            ("reg", vec![Some("Corse")]),
            ("count", vec![Some("4")]),
        ]);
        let rows = normalized(normalize_table(&df, "  ").unwrap());
        assert_eq!(rows[0].disease.as_deref(), Some("inconnue"));
    }

    #[test]
    fn test_normalized_frame_is_a_fixed_point() {
        let df = text_frame(&[
            ("annee", vec![Some("2020"), Some("2021")]),
            ("region", vec![Some("Corse"), Some("Bretagne")]),
            ("valeur", vec![Some("1.25"), Some("3")]),
        ]);
        let NormalizeOutcome::Normalized(first) = normalize_table(&df, "diabete").unwrap() else {
            panic!("expected success");
        };
        let NormalizeOutcome::Normalized(second) = normalize_table(&first, "autre").unwrap() else {
            panic!("expected success");
        };
        assert_eq!(
            read_canonical_rows(&first).unwrap(),
            read_canonical_rows(&second).unwrap()
        );
    }
}
