//! Region name canonicalization.

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use sante_common::any_to_text;
use sante_model::{CanonicalColumn, RegionCorrections};

use crate::error::Result;

/// Maps region spelling variants to their official names.
///
/// The correction table is fixed once the canonicalizer is built. Lookup is
/// exact and case-sensitive after trimming; unknown names pass through
/// trimmed. Close misspellings such as `Bretange` are not corrected.
#[derive(Debug, Clone, Default)]
pub struct RegionCanonicalizer {
    corrections: RegionCorrections,
}

impl RegionCanonicalizer {
    pub fn new(corrections: RegionCorrections) -> Self {
        Self { corrections }
    }

    pub fn corrections(&self) -> &RegionCorrections {
        &self.corrections
    }

    /// Canonical spelling of `raw`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sante_normalize::RegionCanonicalizer;
    ///
    /// let canonicalizer = RegionCanonicalizer::default();
    /// assert_eq!(canonicalizer.canonicalize("  IDF "), "Île-de-France");
    /// assert_eq!(canonicalizer.canonicalize("Bretagne"), "Bretagne");
    /// ```
    pub fn canonicalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        self.corrections
            .lookup(trimmed)
            .unwrap_or(trimmed)
            .to_string()
    }

    /// Returns a copy of `df` with its `region` column canonicalized.
    ///
    /// Frames without a region column come back unchanged; null cells stay
    /// null.
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        let name = CanonicalColumn::Region.name();
        let Ok(column) = df.column(name) else {
            return Ok(df.clone());
        };
        let mut values: Vec<Option<String>> = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            values.push(any_to_text(column.get(idx)?).map(|raw| self.canonicalize(&raw)));
        }
        let mut out = df.clone();
        out.with_column(Series::new(name.into(), values).into_column())?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_variants() {
        let canonicalizer = RegionCanonicalizer::default();
        assert_eq!(
            canonicalizer.canonicalize("Ile de France"),
            "Île-de-France"
        );
        assert_eq!(
            canonicalizer.canonicalize("PACA"),
            "Provence-Alpes-Côte d'Azur"
        );
        assert_eq!(
            canonicalizer.canonicalize("Hauts de France"),
            "Hauts-de-France"
        );
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let canonicalizer = RegionCanonicalizer::default();
        assert_eq!(canonicalizer.canonicalize("idf"), "idf");
        assert_eq!(canonicalizer.canonicalize("Bretange"), "Bretange");
    }

    #[test]
    fn test_apply_on_frame() {
        let df = DataFrame::new(vec![
            Series::new("region".into(), vec![Some("IDF"), None, Some(" Corse ")]).into_column(),
            Series::new("valeur".into(), vec![1.0, 2.0, 3.0]).into_column(),
        ])
        .unwrap();
        let out = RegionCanonicalizer::default().apply(&df).unwrap();
        let region = out.column("region").unwrap();
        assert_eq!(
            any_to_text(region.get(0).unwrap()).as_deref(),
            Some("Île-de-France")
        );
        assert!(region.get(1).unwrap().is_null());
        assert_eq!(any_to_text(region.get(2).unwrap()).as_deref(), Some("Corse"));
        assert_eq!(out.width(), 2);
    }

    #[test]
    fn test_apply_without_region_column() {
        let df = DataFrame::new(vec![
            Series::new("valeur".into(), vec![1.0]).into_column(),
        ])
        .unwrap();
        let out = RegionCanonicalizer::default().apply(&df).unwrap();
        assert_eq!(out.width(), 1);
    }

    fn region_name() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("IDF".to_string()),
            Just("PACA".to_string()),
            Just(" Nouvelle Aquitaine ".to_string()),
            Just("Auvergne Rhone Alpes".to_string()),
            "[A-Za-z' -]{0,24}",
        ]
    }

    proptest! {
        #[test]
        fn prop_canonicalize_is_idempotent(raw in region_name()) {
            let canonicalizer = RegionCanonicalizer::default();
            let once = canonicalizer.canonicalize(&raw);
            prop_assert_eq!(canonicalizer.canonicalize(&once), once.clone());
            prop_assert_eq!(once.trim(), once.as_str());
        }
    }
}
