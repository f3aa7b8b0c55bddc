//! Splitting a merged table per disease.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use sante_model::{CanonicalRow, build_canonical_frame, canonical_columns_of, read_canonical_rows};

use crate::error::Result;

/// Splits `df` into one frame per disease, keyed by disease name.
///
/// Rows without a disease are left out. Each frame keeps the column set and
/// the row order of `df`.
pub fn partition_by_disease(df: &DataFrame) -> Result<BTreeMap<String, DataFrame>> {
    let columns = canonical_columns_of(df);
    let mut groups: BTreeMap<String, Vec<CanonicalRow>> = BTreeMap::new();
    for row in read_canonical_rows(df)? {
        if let Some(disease) = row.disease.clone() {
            groups.entry(disease).or_default().push(row);
        }
    }
    groups
        .into_iter()
        .map(|(disease, rows)| -> Result<(String, DataFrame)> {
            Ok((disease, build_canonical_frame(&columns, &rows)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sante_model::{Observation, observations_to_frame};

    #[test]
    fn test_partition() {
        let df = observations_to_frame(&[
            Observation::new("sida", 2020, "Corse", "deces", 1.0, ""),
            Observation::new("cancer", 2020, "Corse", "incidence", 2.0, ""),
            Observation::new("sida", 2021, "Corse", "deces", 3.0, ""),
        ])
        .unwrap();
        let parts = partition_by_disease(&df).unwrap();
        let names: Vec<&str> = parts.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["cancer", "sida"]);
        assert_eq!(parts["sida"].height(), 2);
        assert_eq!(parts["sida"].width(), 6);
    }
}
