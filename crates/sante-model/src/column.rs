//! Canonical column names.

use serde::{Deserialize, Serialize};

/// Indicator assigned when a source carries no indicator column.
pub const DEFAULT_INDICATOR: &str = "valeur";

/// Disease label used when a row cannot be attributed to a disease.
pub const UNKNOWN_DISEASE: &str = "inconnue";

/// One of the six columns of the canonical schema.
///
/// The canonical order is the declaration order, which is also the order of
/// [`CanonicalColumn::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalColumn {
    Disease,
    Year,
    Region,
    Indicator,
    Value,
    Unit,
}

impl CanonicalColumn {
    /// All columns in canonical order.
    pub const ALL: [CanonicalColumn; 6] = [
        CanonicalColumn::Disease,
        CanonicalColumn::Year,
        CanonicalColumn::Region,
        CanonicalColumn::Indicator,
        CanonicalColumn::Value,
        CanonicalColumn::Unit,
    ];

    /// Columns a persisted canonical table must carry.
    pub const REQUIRED: [CanonicalColumn; 5] = [
        CanonicalColumn::Disease,
        CanonicalColumn::Year,
        CanonicalColumn::Region,
        CanonicalColumn::Indicator,
        CanonicalColumn::Value,
    ];

    /// Columns forming the natural key of an observation.
    pub const KEY: [CanonicalColumn; 4] = [
        CanonicalColumn::Disease,
        CanonicalColumn::Year,
        CanonicalColumn::Region,
        CanonicalColumn::Indicator,
    ];

    /// Column name as it appears in frames, CSV headers and the database.
    pub const fn name(self) -> &'static str {
        match self {
            CanonicalColumn::Disease => "maladie",
            CanonicalColumn::Year => "annee",
            CanonicalColumn::Region => "region",
            CanonicalColumn::Indicator => "indicateur",
            CanonicalColumn::Value => "valeur",
            CanonicalColumn::Unit => "unite",
        }
    }

    /// Looks a column up by its exact canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.name() == name)
    }

    /// Whether the column is part of the observation key.
    pub const fn is_key(self) -> bool {
        matches!(
            self,
            CanonicalColumn::Disease
                | CanonicalColumn::Year
                | CanonicalColumn::Region
                | CanonicalColumn::Indicator
        )
    }

    /// Whether a null in this column disqualifies the row during cleaning.
    pub const fn is_essential(self) -> bool {
        matches!(
            self,
            CanonicalColumn::Disease
                | CanonicalColumn::Year
                | CanonicalColumn::Region
                | CanonicalColumn::Value
        )
    }
}

impl std::fmt::Display for CanonicalColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
