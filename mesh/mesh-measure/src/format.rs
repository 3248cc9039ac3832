//! Display formatting for measured quantities.
//!
//! All values are shown with two decimals. Computation always keeps full
//! precision; rounding happens only here.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Format with exactly two decimals.
///
/// A value exactly halfway between two hundredths rounds away from zero.
/// Values that round to zero from below print as `"0.00"`, not `"-0.00"`.
///
/// ```
/// use mesh_measure::format_fixed;
///
/// assert_eq!(format_fixed(0.0138), "0.01");
/// assert_eq!(format_fixed(0.125), "0.13");
/// assert_eq!(format_fixed(1000.0), "1000.00");
/// assert_eq!(format_fixed(-0.001), "0.00");
/// ```
#[must_use]
pub fn format_fixed(value: f64) -> String {
    let text = match tie_hundredths(value) {
        Some(hundredths) => {
            let sign = if value < 0.0 { "-" } else { "" };
            format!("{sign}{}.{:02}", hundredths / 100, hundredths % 100)
        }
        None => format!("{value:.2}"),
    };
    if text == "-0.00" {
        "0.00".to_string()
    } else {
        text
    }
}

/// `|value|` in hundredths, rounded up, when it lies exactly on a half
/// hundredth.
///
/// Only odd multiples of 1/8 do; `format!` would round those to even.
fn tie_hundredths(value: f64) -> Option<u64> {
    let eighths = (value * 8.0).abs();
    // Above 2^53 every float is an even integer
    if !eighths.is_finite() || eighths.fract() > 0.0 || eighths >= 9_007_199_254_740_992.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let eighths = eighths as u64;
    (eighths % 2 == 1).then(|| (eighths * 25 + 1) / 2)
}

/// Format with two decimals and the integer part grouped by thousands,
/// using a space as separator.
///
/// ```
/// use mesh_measure::format_grouped;
///
/// assert_eq!(format_grouped(1_234_567.891), "1 234 567.89");
/// assert_eq!(format_grouped(999.0), "999.00");
/// ```
#[must_use]
pub fn format_grouped(value: f64) -> String {
    group_thousands(&format_fixed(value))
}

/// Insert a space every three digits in the integer part of `number`.
///
/// The sign and the fractional part are kept as-is. Text that is not a plain
/// decimal number (`NaN`, `inf`) is returned unchanged.
#[must_use]
pub fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return number.to_string();
    }

    let mut out = String::with_capacity(number.len() + int_part.len() / 3);
    out.push_str(sign);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(digit);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Display strings for a part's volume and surface area.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FormattedMetrics {
    /// Volume in mm³, two decimals.
    pub volume: String,
    /// Surface area in mm², two decimals.
    pub surface_area: String,
}

impl FormattedMetrics {
    pub(crate) fn new(volume: f64, surface_area: f64) -> Self {
        Self {
            volume: format_fixed(volume),
            surface_area: format_fixed(surface_area),
        }
    }
}
