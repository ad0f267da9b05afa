//! Small arithmetic helpers shared by the position math.

use super::error::IndicatoryError;

/// `numerator / denominator`, failing instead of producing `inf`/`NaN`.
pub fn checked_div(
    numerator: f64,
    denominator: f64,
    operation: &'static str,
) -> Result<f64, IndicatoryError> {
    if denominator == 0.0 {
        return Err(IndicatoryError::DivisionByZero { operation });
    }
    Ok(numerator / denominator)
}

/// Round to `places` decimal places, ties to even like share counts.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round_ties_even() / scale
}
