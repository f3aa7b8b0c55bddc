//! Long/wide layout detection.

use std::fmt;

use crate::synonyms::{SourceField, find_column};

/// Where the canonical fields live in a source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// One observation per row.
    Long {
        year: String,
        region: String,
        value: String,
        indicator: Option<String>,
        unit: Option<String>,
        disease: Option<String>,
    },
    /// One row per region, one column per year.
    Wide {
        region: String,
        /// Source column name and the year it holds, in column order.
        year_columns: Vec<(String, i64)>,
        indicator: Option<String>,
        unit: Option<String>,
    },
}

/// Required fields that no source column matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields(pub Vec<SourceField>);

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|field| field.canonical_name()).collect();
        f.write_str(&names.join(", "))
    }
}

/// Parses a header that is exactly four ASCII digits once trimmed.
fn header_year(name: &str) -> Option<i64> {
    let trimmed = name.trim();
    if trimmed.len() == 4 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        trimmed.parse().ok()
    } else {
        None
    }
}

/// Decides how to read a table from its column names.
///
/// The long layout wins whenever year, region and value columns are all
/// present. Otherwise a region column plus at least one year-named column
/// selects the wide layout. The error lists the long-layout fields that were
/// not found.
pub fn detect_layout(columns: &[String]) -> Result<Layout, MissingFields> {
    let year = find_column(columns, SourceField::Year);
    let region = find_column(columns, SourceField::Region);
    let value = find_column(columns, SourceField::Value);
    let indicator = find_column(columns, SourceField::Indicator);
    let unit = find_column(columns, SourceField::Unit);

    if let (Some(year), Some(region), Some(value)) = (&year, &region, &value) {
        return Ok(Layout::Long {
            year: year.clone(),
            region: region.clone(),
            value: value.clone(),
            indicator,
            unit,
            disease: find_column(columns, SourceField::Disease),
        });
    }

    let year_columns: Vec<(String, i64)> = columns
        .iter()
        .filter_map(|name| header_year(name).map(|y| (name.clone(), y)))
        .collect();
    if let Some(region) = &region
        && !year_columns.is_empty()
    {
        return Ok(Layout::Wide {
            region: region.clone(),
            year_columns,
            indicator,
            unit,
        });
    }

    let missing = [
        (SourceField::Value, value.is_none()),
        (SourceField::Year, year.is_none()),
        (SourceField::Region, region.is_none()),
    ]
    .into_iter()
    .filter_map(|(field, absent)| absent.then_some(field))
    .collect();
    Err(MissingFields(missing))
}
