//! # Unit Conversion
//!
//! Conversion between the ledger's fixed-point integer unit and the decimal
//! display unit shown to the user. One display unit is 10^8 raw units.

use crate::config::units::UNIT_SCALE;

/// Convert a raw ledger amount to its decimal display value.
///
/// Splits the integer into whole and fractional parts before going through
/// floating point, so amounts beyond f64's exact-integer range still convert
/// without drift in the whole part.
pub fn to_display(raw: u64) -> f64 {
    let whole = raw / UNIT_SCALE;
    let frac = raw % UNIT_SCALE;
    whole as f64 + frac as f64 / UNIT_SCALE as f64
}

/// Convert a decimal display amount to raw ledger units.
///
/// Truncates toward zero, so rounding can never charge the user more than
/// they asked for. Negative inputs truncate to zero.
pub fn to_raw(display: f64) -> u64 {
    let scaled = display * UNIT_SCALE as f64;
    if scaled <= 0.0 || !scaled.is_finite() {
        return 0;
    }
    scaled.trunc() as u64
}
