//! Shared utilities for the health-statistics pipeline crates.
//!
//! Cell conversion from Polars `AnyValue`s and the lenient number parsing used
//! when coercing heterogeneous public data files.

mod numeric;
mod values;

pub use numeric::{round_half_away, round_value};
pub use values::{
    any_to_f64, any_to_integral, any_to_string, any_to_text, format_numeric, parse_f64,
    parse_integral,
};
