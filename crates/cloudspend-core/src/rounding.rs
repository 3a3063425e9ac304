//! Decimal rounding for monetary values
//!
//! Rounding goes through the exact decimal expansion of the `f64` so that
//! ties are resolved on the true binary value, never on an intermediate
//! product such as `value * 10^n`.

/// Round `value` to `digits` fractional digits
///
/// # Examples
/// ```
/// use cloudspend_core::rounding::round_to;
///
/// assert_eq!(round_to(12.34567, 4), 12.3457);
/// assert_eq!(round_to(2.675, 2), 2.67); // 2.675 is stored as 2.67499999...
/// ```
pub fn round_to(value: f64, digits: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.digits$}").parse().unwrap_or(value)
}
