//! Canonical data model for the health-statistics pipeline.
//!
//! Every source file, whatever its shape, ends up as rows of the same six
//! canonical columns:
//!
//! | column       | meaning                          | dtype   |
//! |--------------|----------------------------------|---------|
//! | `maladie`    | disease the observation covers   | String  |
//! | `annee`      | observation year                 | Int64   |
//! | `region`     | canonical region name            | String  |
//! | `indicateur` | measure (prevalence, incidence)  | String  |
//! | `valeur`     | numeric value                    | Float64 |
//! | `unite`      | unit of `valeur` (optional)      | String  |
//!
//! # Module Organization
//!
//! - [`column`]: the canonical column enum and its wire names
//! - [`observation`]: strict [`Observation`] rows and nullable [`CanonicalRow`]s
//! - [`frame`]: building and reading canonical Polars frames
//! - [`regions`]: the region spelling correction table
//! - [`units`]: default units derived from the indicator

pub mod column;
pub mod frame;
pub mod observation;
pub mod regions;
pub mod units;

pub use column::{CanonicalColumn, DEFAULT_INDICATOR, UNKNOWN_DISEASE};
pub use frame::{
    build_canonical_frame, canonical_columns_of, concat_canonical, frame_to_observations,
    observations_to_frame, read_canonical_rows,
};
pub use observation::{CanonicalRow, Observation, ObservationKey};
pub use regions::RegionCorrections;
pub use units::{default_unit_for, with_default_units};
