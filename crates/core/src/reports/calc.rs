//! Guarded arithmetic shared by the statements.

use rust_decimal::{Decimal, RoundingStrategy};

/// Reconciliation and noise tolerance (one cent).
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Divides, yielding `0` when the denominator is zero.
#[must_use]
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// `value / base * 100`, `0` when the base is zero.
#[must_use]
pub fn percent_of(value: Decimal, base: Decimal) -> Decimal {
    safe_div(value, base) * Decimal::ONE_HUNDRED
}

/// Rounds a percentage for presentation (2 dp, banker's rounding).
#[must_use]
pub fn round_percent(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Average of an opening and a closing balance.
#[must_use]
pub fn average(a: Decimal, b: Decimal) -> Decimal {
    (a + b) / Decimal::TWO
}

/// Whether two amounts agree within [`TOLERANCE`].
#[must_use]
pub fn within_tolerance(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tolerance_is_one_cent() {
        assert_eq!(TOLERANCE, dec!(0.01));
    }

    #[test]
    fn test_safe_div_zero_denominator() {
        assert_eq!(safe_div(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(safe_div(dec!(10), dec!(4)), dec!(2.5));
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(dec!(25), dec!(200)), dec!(12.5));
        assert_eq!(percent_of(dec!(25), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_within_tolerance() {
        assert!(within_tolerance(dec!(100.00), dec!(100.01)));
        assert!(!within_tolerance(dec!(100.00), dec!(100.02)));
    }
}
