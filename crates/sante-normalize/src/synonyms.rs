//! Column synonym tables.
//!
//! Lookups compare trimmed, lowercased column names against each synonym in
//! order; the first synonym matching any column wins, so earlier entries take
//! precedence over later ones regardless of column order.

use std::fmt;

/// A canonical field the normalizer looks for in a source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceField {
    Year,
    Region,
    Indicator,
    Value,
    Unit,
    Disease,
}

const YEAR: &[&str] = &["annee", "année", "year", "an"];
const REGION: &[&str] = &[
    "region",
    "région",
    "departement",
    "dept",
    "region_name",
    "libelle",
    "code_reg",
    "reg",
];
const INDICATOR: &[&str] = &["indicateur", "indicator", "type", "measure", "mesure"];
const VALUE: &[&str] = &["valeur", "value", "val", "nombre", "count", "valeur_tot"];
const UNIT: &[&str] = &["unite", "unité", "unit"];
const DISEASE: &[&str] = &["maladie", "disease", "diagnosis", "pathology"];

impl SourceField {
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            Self::Year => YEAR,
            Self::Region => REGION,
            Self::Indicator => INDICATOR,
            Self::Value => VALUE,
            Self::Unit => UNIT,
            Self::Disease => DISEASE,
        }
    }

    /// Canonical column this field feeds.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Self::Year => "annee",
            Self::Region => "region",
            Self::Indicator => "indicateur",
            Self::Value => "valeur",
            Self::Unit => "unite",
            Self::Disease => "maladie",
        }
    }
}

impl fmt::Display for SourceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Finds the source column carrying `field`, returning its original name.
///
/// # Examples
///
/// ```
/// use sante_normalize::{SourceField, find_column};
///
/// let columns = vec!["Code_Reg".to_string(), " Année ".to_string()];
/// assert_eq!(find_column(&columns, SourceField::Year), Some(" Année ".to_string()));
/// assert_eq!(find_column(&columns, SourceField::Region), Some("Code_Reg".to_string()));
/// assert_eq!(find_column(&columns, SourceField::Value), None);
/// ```
pub fn find_column(columns: &[String], field: SourceField) -> Option<String> {
    let lowered: Vec<String> = columns
        .iter()
        .map(|name| name.trim().to_lowercase())
        .collect();
    field.synonyms().iter().find_map(|synonym| {
        lowered
            .iter()
            .position(|name| name == synonym)
            .map(|idx| columns[idx].clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_synonym_order_wins_over_column_order() {
        let columns = names(&["reg", "libelle", "Region"]);
        assert_eq!(
            find_column(&columns, SourceField::Region),
            Some("Region".to_string())
        );
    }

    #[test]
    fn test_no_partial_matches() {
        let columns = names(&["annee_naissance", "valeurs"]);
        assert_eq!(find_column(&columns, SourceField::Year), None);
        assert_eq!(find_column(&columns, SourceField::Value), None);
    }

    #[test]
    fn test_accented_synonyms() {
        let columns = names(&["UNITÉ", "Indicator"]);
        assert_eq!(
            find_column(&columns, SourceField::Unit),
            Some("UNITÉ".to_string())
        );
        assert_eq!(
            find_column(&columns, SourceField::Indicator),
            Some("Indicator".to_string())
        );
    }
}
