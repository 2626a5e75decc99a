//! Decimal rounding for display values
//!
//! Binary floats cannot represent most `.xx5` midpoints exactly, so rounding
//! the `f64` directly sends values like `1000.555` down to `1000.55`. Values are
//! instead formatted to their shortest round-trip string, parsed into a
//! fixed-point [`Decimal`], and rounded half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Decimal places kept on every projected value
pub const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// Round `value` to `decimal_places` using round-half-up
///
/// Returns `None` when the value is not finite or does not fit in a `Decimal`
/// (magnitude above ~7.9e28).
pub fn round_half_up(value: f64, decimal_places: u32) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }

    // Anything this small rounds to zero; its full decimal expansion can
    // exceed Decimal's 28-digit scale.
    let negligible = 10f64.powi(-(decimal_places as i32) - 1);
    if value.abs() < negligible {
        return Some(0.0);
    }

    let decimal = Decimal::from_str(&value.to_string()).ok()?;
    decimal
        .round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
        .to_string()
        .parse()
        .ok()
}
