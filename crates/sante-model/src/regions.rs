//! Region spelling corrections.
//!
//! Sources spell the same region in several ways (`IDF`, `Ile de France`,
//! `Île-de-France`). The correction table maps known variants to the official
//! name. Matching is exact after trimming; unknown spellings pass through.

use std::collections::BTreeMap;

const DEFAULT_CORRECTIONS: &[(&str, &str)] = &[
    ("Ile-de-France", "Île-de-France"),
    ("Ile de France", "Île-de-France"),
    ("IDF", "Île-de-France"),
    ("PACA", "Provence-Alpes-Côte d'Azur"),
    ("Auvergne Rhône Alpes", "Auvergne-Rhône-Alpes"),
    ("Auvergne Rhone Alpes", "Auvergne-Rhône-Alpes"),
    ("Nouvelle Aquitaine", "Nouvelle-Aquitaine"),
    ("Hauts de France", "Hauts-de-France"),
];

/// Table of variant spelling to canonical region name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionCorrections {
    entries: BTreeMap<String, String>,
}

impl Default for RegionCorrections {
    fn default() -> Self {
        Self::from_entries(
            DEFAULT_CORRECTIONS
                .iter()
                .map(|(from, to)| ((*from).to_string(), (*to).to_string())),
        )
    }
}

impl RegionCorrections {
    /// A table that corrects nothing.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(from, to)| (from.trim().to_string(), to))
                .collect(),
        }
    }

    /// Adds or replaces entries, returning the extended table.
    #[must_use]
    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = (String, String)>) -> Self {
        for (from, to) in overrides {
            self.entries.insert(from.trim().to_string(), to);
        }
        self
    }

    /// Official spelling for `variant`, if it is a known variant.
    pub fn lookup(&self, variant: &str) -> Option<&str> {
        self.entries.get(variant).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = RegionCorrections::default();
        assert_eq!(table.lookup("IDF"), Some("Île-de-France"));
        assert_eq!(table.lookup("PACA"), Some("Provence-Alpes-Côte d'Azur"));
        assert_eq!(table.lookup("Bretagne"), None);
        assert_eq!(table.len(), DEFAULT_CORRECTIONS.len());
    }

    #[test]
    fn test_overrides_replace_and_extend() {
        let table = RegionCorrections::default().with_overrides([
            ("IDF".to_string(), "Paris region".to_string()),
            (" Centre ".to_string(), "Centre-Val de Loire".to_string()),
        ]);
        assert_eq!(table.lookup("IDF"), Some("Paris region"));
        assert_eq!(table.lookup("Centre"), Some("Centre-Val de Loire"));
    }

    #[test]
    fn test_empty_table() {
        assert!(RegionCorrections::empty().is_empty());
    }
}
