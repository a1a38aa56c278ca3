//! # Money Module
//!
//! Decimal rounding for prices, subtotals and discounts.
//!
//! ## Why Not `f64::round`?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Naive rounding scales first, then rounds:                              │
//! │    (1.005 * 100.0).round() / 100.0 = 1.00   ❌ (1.005 is 1.00499..)     │
//! │    (2.675 * 100.0).round() / 100.0 = 2.67   ❌                          │
//! │                                                                         │
//! │  OUR SOLUTION: round the decimal the float PRINTS as                    │
//! │    1.005 → "1.005" → digits 1 0 0 | 5 → 1.01                           │
//! │    2.675 → "2.675" → digits 2 6 7 | 5 → 2.68                           │
//! │                                                                         │
//! │  Rust prints f64 with the shortest digits that round-trip, so the      │
//! │  decimal we round is exactly the number the caller typed.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Mode
//! Half away from zero: `0.5 → 1`, `1.5 → 2`, `2.5 → 3`, `-2.5 → -3`.
//!
//! ## Usage
//! ```rust
//! use cartkit_core::money::{percent_of, round_half_away};
//!
//! assert_eq!(round_half_away(700.0, 2), 700.0);
//! assert_eq!(percent_of(700.0, 10, 2), 70.0);
//! ```

use crate::MAX_PRECISION;

/// Longest integer part (in digits) we round through `i128`.
///
/// Anything larger is returned unchanged; at that magnitude f64 has no
/// fractional digits left to round.
const MAX_INTEGER_DIGITS: usize = 27;

// =============================================================================
// Rounding
// =============================================================================

/// Rounds `value` to `precision` decimal digits, half away from zero.
///
/// `precision` is clamped to [`MAX_PRECISION`]. Non-finite values are
/// returned unchanged.
///
/// ## Example
/// ```rust
/// use cartkit_core::money::round_half_away;
///
/// assert_eq!(round_half_away(2.675, 2), 2.68);
/// assert_eq!(round_half_away(0.125, 2), 0.13);
/// assert_eq!(round_half_away(-0.125, 2), -0.13);
/// assert_eq!(round_half_away(1234.5, 0), 1235.0);
/// ```
pub fn round_half_away(value: f64, precision: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let precision = precision.min(MAX_PRECISION) as usize;

    // Shortest round-trip representation, never in exponent form
    let repr = format!("{}", value.abs());
    let (int_part, frac_part) = match repr.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (repr.as_str(), ""),
    };

    if frac_part.len() <= precision || int_part.len() > MAX_INTEGER_DIGITS {
        return value;
    }

    let kept = &frac_part[..precision];
    let round_up = frac_part.as_bytes()[precision] >= b'5';

    let mut scaled: i128 = 0;
    for digit in int_part.bytes().chain(kept.bytes()) {
        scaled = scaled * 10 + i128::from(digit - b'0');
    }
    if round_up {
        scaled += 1;
    }

    let magnitude = scaled as f64 / 10f64.powi(precision as i32);
    if value.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    }
}

/// Returns `percent`% of `amount`, rounded to `precision` digits.
///
/// ## Example
/// ```rust
/// use cartkit_core::money::percent_of;
///
/// assert_eq!(percent_of(700.0, 10, 2), 70.0);
/// assert_eq!(percent_of(19.99, 15, 2), 3.0); // 2.9985 → 3.00
/// ```
pub fn percent_of(amount: f64, percent: u8, precision: u32) -> f64 {
    round_half_away(amount * f64::from(percent) / 100.0, precision)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_values_untouched() {
        assert_eq!(round_half_away(700.0, 2), 700.0);
        assert_eq!(round_half_away(12.5, 2), 12.5);
        assert_eq!(round_half_away(0.0, 2), 0.0);
    }

    #[test]
    fn test_half_rounds_away_from_zero() {
        assert_eq!(round_half_away(0.5, 0), 1.0);
        assert_eq!(round_half_away(1.5, 0), 2.0);
        assert_eq!(round_half_away(2.5, 0), 3.0);
        assert_eq!(round_half_away(-2.5, 0), -3.0);
        assert_eq!(round_half_away(0.125, 2), 0.13);
    }

    #[test]
    fn test_binary_representation_does_not_leak() {
        // Naive scaling gets both of these wrong
        assert_eq!(round_half_away(1.005, 2), 1.01);
        assert_eq!(round_half_away(2.675, 2), 2.68);
    }

    #[test]
    fn test_below_half_rounds_down() {
        assert_eq!(round_half_away(1.004, 2), 1.0);
        assert_eq!(round_half_away(-1.004, 2), -1.0);
        assert_eq!(round_half_away(9.9949, 2), 9.99);
    }

    #[test]
    fn test_carry_propagates() {
        assert_eq!(round_half_away(9.995, 2), 10.0);
        assert_eq!(round_half_away(99.5, 0), 100.0);
    }

    #[test]
    fn test_sum_noise_is_cleaned() {
        // 0.1 + 0.2 = 0.30000000000000004
        assert_eq!(round_half_away(0.1 + 0.2, 2), 0.3);
    }

    #[test]
    fn test_non_finite_passthrough() {
        assert!(round_half_away(f64::NAN, 2).is_nan());
        assert_eq!(round_half_away(f64::INFINITY, 2), f64::INFINITY);
    }

    #[test]
    fn test_precision_is_clamped() {
        let x = 0.123_456_789_012_345;
        assert_eq!(round_half_away(x, 50), round_half_away(x, MAX_PRECISION));
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(700.0, 10, 2), 70.0);
        assert_eq!(percent_of(700.0, 0, 2), 0.0);
        assert_eq!(percent_of(700.0, 100, 2), 700.0);
        assert_eq!(percent_of(19.99, 15, 2), 3.0);
    }
}
