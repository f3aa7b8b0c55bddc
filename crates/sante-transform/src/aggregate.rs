//! Reduction to one row per observation key.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use sante_common::round_value;
use sante_model::{
    CanonicalColumn, CanonicalRow, build_canonical_frame, canonical_columns_of, read_canonical_rows,
};

use crate::error::Result;

type GroupKey = (Option<String>, Option<i64>, Option<String>, Option<String>);

#[derive(Default)]
struct Group {
    values: Vec<f64>,
    unit: Option<String>,
}

impl Group {
    fn add(&mut self, row: &CanonicalRow) {
        if let Some(value) = row.value {
            self.values.push(value);
        }
        if let Some(unit) = row.unit.as_deref().filter(|u| !u.is_empty())
            && self.unit.as_deref().is_none_or(|current| unit < current)
        {
            self.unit = Some(unit.to_string());
        }
    }

    /// Mean of the group, summed in sorted order so the result does not depend
    /// on row order.
    fn mean(&mut self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        self.values.sort_by(f64::total_cmp);
        let sum: f64 = self.values.iter().sum();
        Some(round_value(sum / self.values.len() as f64))
    }
}

fn group_key(row: &CanonicalRow, present: &[CanonicalColumn]) -> Option<GroupKey> {
    let has = |column: CanonicalColumn| present.contains(&column);
    if CanonicalColumn::KEY
        .into_iter()
        .any(|column| has(column) && row.is_null(column))
    {
        return None;
    }
    Some((
        row.disease.clone().filter(|_| has(CanonicalColumn::Disease)),
        row.year.filter(|_| has(CanonicalColumn::Year)),
        row.region.clone().filter(|_| has(CanonicalColumn::Region)),
        row.indicator.clone().filter(|_| has(CanonicalColumn::Indicator)),
    ))
}

/// Averages `valeur` over rows sharing (disease, year, region, indicator).
///
/// Only the key columns present in `df` form the key. Rows with a null key
/// cell are dropped. Values are rounded half away from zero to two decimals.
/// When `unite` is present, each group carries its smallest non-empty unit.
/// Groups come out in key order.
pub fn aggregate(df: &DataFrame) -> Result<DataFrame> {
    let present = canonical_columns_of(df);
    let rows = read_canonical_rows(df)?;
    let input_rows = rows.len();

    let mut groups: BTreeMap<GroupKey, Group> = BTreeMap::new();
    let mut dropped = 0usize;
    for row in &rows {
        match group_key(row, &present) {
            Some(key) => groups.entry(key).or_default().add(row),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        tracing::warn!(dropped, "rows with a null key column left out of aggregation");
    }

    let keep_unit = present.contains(&CanonicalColumn::Unit);
    let mut output = Vec::with_capacity(groups.len());
    for ((disease, year, region, indicator), mut group) in groups {
        output.push(CanonicalRow {
            disease,
            year,
            region,
            indicator,
            value: group.mean(),
            unit: keep_unit.then(|| group.unit.take().unwrap_or_default()),
        });
    }

    let columns: Vec<CanonicalColumn> = CanonicalColumn::ALL
        .into_iter()
        .filter(|column| *column == CanonicalColumn::Value || present.contains(column))
        .collect();
    tracing::debug!(input = input_rows, groups = output.len(), "aggregated table");
    Ok(build_canonical_frame(&columns, &output)?)
}
