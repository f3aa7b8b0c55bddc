//! Row types of the canonical schema.

use serde::{Deserialize, Serialize};

use crate::column::{CanonicalColumn, DEFAULT_INDICATOR};

/// A canonical row as read from a frame, before completeness is checked.
///
/// Every field is optional because the frame may lack the column or the
/// cell may be null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalRow {
    pub disease: Option<String>,
    pub year: Option<i64>,
    pub region: Option<String>,
    pub indicator: Option<String>,
    pub value: Option<f64>,
    pub unit: Option<String>,
}

impl CanonicalRow {
    /// Whether the cell for `column` is null.
    pub fn is_null(&self, column: CanonicalColumn) -> bool {
        match column {
            CanonicalColumn::Disease => self.disease.is_none(),
            CanonicalColumn::Year => self.year.is_none(),
            CanonicalColumn::Region => self.region.is_none(),
            CanonicalColumn::Indicator => self.indicator.is_none(),
            CanonicalColumn::Value => self.value.is_none(),
            CanonicalColumn::Unit => self.unit.is_none(),
        }
    }

    /// Whether every cell is null.
    pub fn is_empty(&self) -> bool {
        CanonicalColumn::ALL.into_iter().all(|c| self.is_null(c))
    }
}

/// Natural key of an observation: at most one row per key in a merged table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationKey {
    pub disease: String,
    pub year: i64,
    pub region: String,
    pub indicator: String,
}

/// A complete observation, the unit stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(rename = "maladie")]
    pub disease: String,
    #[serde(rename = "annee")]
    pub year: i64,
    pub region: String,
    #[serde(rename = "indicateur")]
    pub indicator: String,
    #[serde(rename = "valeur")]
    pub value: f64,
    #[serde(rename = "unite", default)]
    pub unit: String,
}

impl Observation {
    pub fn new(
        disease: impl Into<String>,
        year: i64,
        region: impl Into<String>,
        indicator: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            disease: disease.into(),
            year,
            region: region.into(),
            indicator: indicator.into(),
            value,
            unit: unit.into(),
        }
    }

    /// Builds an observation from a row, `None` when an essential cell is null.
    ///
    /// A missing indicator falls back to [`DEFAULT_INDICATOR`] and a missing
    /// unit to the empty string.
    pub fn from_row(row: &CanonicalRow) -> Option<Self> {
        Some(Self {
            disease: row.disease.clone()?,
            year: row.year?,
            region: row.region.clone()?,
            indicator: row
                .indicator
                .clone()
                .unwrap_or_else(|| DEFAULT_INDICATOR.to_string()),
            value: row.value?,
            unit: row.unit.clone().unwrap_or_default(),
        })
    }

    pub fn key(&self) -> ObservationKey {
        ObservationKey {
            disease: self.disease.clone(),
            year: self.year,
            region: self.region.clone(),
            indicator: self.indicator.clone(),
        }
    }

    pub fn to_row(&self) -> CanonicalRow {
        CanonicalRow {
            disease: Some(self.disease.clone()),
            year: Some(self.year),
            region: Some(self.region.clone()),
            indicator: Some(self.indicator.clone()),
            value: Some(self.value),
            unit: Some(self.unit.clone()),
        }
    }
}
