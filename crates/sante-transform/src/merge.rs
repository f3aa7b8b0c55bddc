//! Merging of per-disease tables.

use std::cmp::Ordering;

use polars::prelude::DataFrame;
use sante_model::{
    CanonicalRow, build_canonical_frame, canonical_columns_of, concat_canonical,
    read_canonical_rows,
};

use crate::error::Result;

/// Orders `Some` values ascending with nulls after every value.
fn nulls_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn merge_order(a: &CanonicalRow, b: &CanonicalRow) -> Ordering {
    nulls_last(&a.year, &b.year)
        .then_with(|| nulls_last(&a.disease, &b.disease))
        .then_with(|| nulls_last(&a.region, &b.region))
}

/// Concatenates tables and sorts the result by (year, disease, region).
///
/// The sort is stable, so rows sharing those three cells keep their input
/// order. Nothing is deduplicated: identical keys coming from different
/// inputs all survive.
pub fn merge_frames(frames: &[DataFrame]) -> Result<DataFrame> {
    let combined = concat_canonical(frames)?;
    let columns = canonical_columns_of(&combined);
    let mut rows = read_canonical_rows(&combined)?;
    rows.sort_by(merge_order);
    tracing::debug!(inputs = frames.len(), rows = rows.len(), "merged tables");
    Ok(build_canonical_frame(&columns, &rows)?)
}
