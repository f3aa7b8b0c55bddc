//! Default units derived from the indicator name.

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};
use sante_common::any_to_text;

use crate::column::CanonicalColumn;

/// Conventional unit for an indicator, empty when there is none.
///
/// # Examples
///
/// ```
/// use sante_model::default_unit_for;
///
/// assert_eq!(default_unit_for("prevalence"), "%");
/// assert_eq!(default_unit_for("Incidence"), "pour 100 000 hab");
/// assert_eq!(default_unit_for("deces"), "");
/// ```
pub fn default_unit_for(indicator: &str) -> &'static str {
    match indicator.trim().to_lowercase().as_str() {
        "prevalence" | "prévalence" => "%",
        "incidence" | "mortalite" | "mortalité" => "pour 100 000 hab",
        _ => "",
    }
}

/// Adds a `unite` column derived from `indicateur` when the frame has none.
///
/// Frames that already carry a unit column, or lack an indicator column, are
/// returned unchanged.
pub fn with_default_units(mut df: DataFrame) -> PolarsResult<DataFrame> {
    if df.column(CanonicalColumn::Unit.name()).is_ok() {
        return Ok(df);
    }
    let Ok(indicator) = df.column(CanonicalColumn::Indicator.name()) else {
        return Ok(df);
    };
    let mut units = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let unit = any_to_text(indicator.get(idx)?)
            .map(|value| default_unit_for(&value))
            .unwrap_or_default();
        units.push(unit.to_string());
    }
    df.with_column(Series::new(CanonicalColumn::Unit.name().into(), units).into_column())?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_default_units_adds_column() {
        let df = DataFrame::new(vec![
            Series::new("indicateur".into(), vec!["prevalence", "mortalite", "autre"])
                .into_column(),
        ])
        .unwrap();
        let df = with_default_units(df).unwrap();
        let unit = df.column("unite").unwrap();
        assert_eq!(sante_common::any_to_string(unit.get(0).unwrap()), "%");
        assert_eq!(
            sante_common::any_to_string(unit.get(1).unwrap()),
            "pour 100 000 hab"
        );
        assert_eq!(sante_common::any_to_string(unit.get(2).unwrap()), "");
    }

    #[test]
    fn test_with_default_units_keeps_existing() {
        let df = DataFrame::new(vec![
            Series::new("indicateur".into(), vec!["prevalence"]).into_column(),
            Series::new("unite".into(), vec!["pour mille"]).into_column(),
        ])
        .unwrap();
        let df = with_default_units(df).unwrap();
        assert_eq!(
            sante_common::any_to_string(df.column("unite").unwrap().get(0).unwrap()),
            "pour mille"
        );
    }
}
