//! Rounding of aggregated values.

/// Rounds `value` to `decimals` places, halves away from zero.
///
/// `2.675` is stored as `2.67499999...` in binary, so the scaled product is
/// rounded after a relative nudge that absorbs that representation error.
///
/// # Examples
///
/// ```
/// use sante_common::round_half_away;
///
/// assert_eq!(round_half_away(15.0, 2), 15.0);
/// assert_eq!(round_half_away(1.005, 2), 1.01);
/// assert_eq!(round_half_away(-1.005, 2), -1.01);
/// assert_eq!(round_half_away(2.344, 2), 2.34);
/// ```
pub fn round_half_away(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    let nudged = scaled + scaled.signum() * scaled.abs().max(1.0) * f64::EPSILON * 4.0;
    nudged.round() / factor
}

/// Rounds an aggregated observation value to the two decimals stored downstream.
pub fn round_value(value: f64) -> f64 {
    round_half_away(value, 2)
}
