//! Raw tables: text cells under the header names found in the source.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};

/// A table extracted from a source container.
///
/// Cells are kept as text (null when blank); the normalizer decides what each
/// column means.
#[derive(Debug, Clone)]
pub struct RawTable {
    /// File, archive entry or sheet the table came from, for diagnostics.
    pub label: String,
    pub data: DataFrame,
}

impl RawTable {
    pub fn new(label: impl Into<String>, data: DataFrame) -> Self {
        Self {
            label: label.into(),
            data,
        }
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }
}

fn clean_cell(raw: &str) -> &str {
    raw.trim().trim_matches('\u{feff}').trim()
}

/// Makes header names usable as frame columns.
///
/// Blank names become `column_<n>` (1-based) and repeated names get a `.1`,
/// `.2`... suffix in order of appearance, skipping names already taken.
fn unique_headers(raw: &[String]) -> Vec<String> {
    let mut suffixes: BTreeMap<String, usize> = BTreeMap::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut headers = Vec::with_capacity(raw.len());
    for (idx, name) in raw.iter().enumerate() {
        let cleaned = clean_cell(name);
        let base = if cleaned.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            cleaned.to_string()
        };
        let count = suffixes.entry(base.clone()).or_insert(0);
        let mut header = base.clone();
        while seen.contains(&header) {
            *count += 1;
            header = format!("{base}.{count}");
        }
        seen.insert(header.clone());
        headers.push(header);
    }
    headers
}

/// Builds a frame of nullable text columns from a header and data rows.
///
/// Ragged rows are padded with nulls (or truncated) to the header width and
/// rows without any non-blank cell are dropped.
pub fn frame_from_text(headers: &[String], rows: &[Vec<String>]) -> PolarsResult<DataFrame> {
    let names = unique_headers(headers);
    let kept: Vec<&Vec<String>> = rows
        .iter()
        .filter(|row| row.iter().any(|cell| !clean_cell(cell).is_empty()))
        .collect();

    let columns: Vec<Column> = names
        .iter()
        .enumerate()
        .map(|(col_idx, name)| {
            let values: Vec<Option<String>> = kept
                .iter()
                .map(|row| {
                    row.get(col_idx)
                        .map(|cell| clean_cell(cell))
                        .filter(|cell| !cell.is_empty())
                        .map(str::to_string)
                })
                .collect();
            Series::new(name.as_str().into(), values).into_column()
        })
        .collect();
    DataFrame::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_unique_headers() {
        let headers = unique_headers(&strings(&["\u{feff}annee", " ", "valeur", "valeur"]));
        assert_eq!(headers, strings(&["annee", "column_2", "valeur", "valeur.1"]));

        let headers = unique_headers(&strings(&["valeur", "valeur", "valeur.1", "valeur"]));
        assert_eq!(
            headers,
            strings(&["valeur", "valeur.1", "valeur.1.1", "valeur.2"])
        );
    }

    #[test]
    fn test_frame_from_text_with_suffix_collision() {
        let headers = strings(&["valeur", "valeur", "valeur.1"]);
        let df = frame_from_text(&headers, &[strings(&["1", "2", "3"])]).unwrap();
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_frame_from_text_pads_and_drops_blank_rows() {
        let headers = strings(&["region", "2019", "2020"]);
        let rows = vec![
            strings(&["Bretagne", "1", "2"]),
            strings(&["", " ", ""]),
            strings(&["Corse", "3"]),
        ];
        let df = frame_from_text(&headers, &rows).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        assert!(df.column("2020").unwrap().get(1).unwrap().is_null());
    }

    #[test]
    fn test_raw_table_column_names() {
        let df = frame_from_text(&strings(&["a", "b"]), &[strings(&["1", "2"])]).unwrap();
        let table = RawTable::new("sample.csv", df);
        assert_eq!(table.column_names(), strings(&["a", "b"]));
        assert_eq!(table.height(), 1);
    }
}
